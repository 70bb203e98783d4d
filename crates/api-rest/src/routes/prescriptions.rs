//! `/api/v1/receitas` routes.

use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use hospital_core::dto::PrescriptionDto;

use crate::error::{ApiError, OrReject};
use crate::routes::created;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(find).put(update).delete(remove))
        .route("/consulta/:consulta_id", get(list_by_appointment))
        .route("/paciente/:paciente_id", get(list_by_patient))
        .route("/medicamento", get(search_by_medication))
}

#[derive(Deserialize)]
pub(crate) struct MedicationQuery {
    nome: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/receitas",
    responses(
        (status = 200, description = "All prescriptions", body = [PrescriptionDto])
    )
)]
#[axum::debug_handler]
pub(crate) async fn list(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Vec<PrescriptionDto>>, ApiError> {
    let prescriptions = state.prescriptions.list_all().await.or_reject(&uri)?;
    Ok(Json(prescriptions))
}

#[utoipa::path(
    get,
    path = "/api/v1/receitas/{id}",
    responses(
        (status = 200, description = "Prescription found", body = PrescriptionDto),
        (status = 404, description = "Prescription not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn find(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> Result<Json<PrescriptionDto>, ApiError> {
    let prescription = state.prescriptions.find_by_id(id).await.or_reject(&uri)?;
    Ok(Json(prescription))
}

#[utoipa::path(
    get,
    path = "/api/v1/receitas/consulta/{consultaId}",
    responses(
        (status = 200, description = "Prescriptions issued in the appointment", body = [PrescriptionDto])
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_by_appointment(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(consulta_id): Path<i64>,
) -> Result<Json<Vec<PrescriptionDto>>, ApiError> {
    let prescriptions = state
        .prescriptions
        .list_by_appointment(consulta_id)
        .await
        .or_reject(&uri)?;
    Ok(Json(prescriptions))
}

#[utoipa::path(
    get,
    path = "/api/v1/receitas/paciente/{pacienteId}",
    responses(
        (status = 200, description = "Prescriptions across the patient's appointments", body = [PrescriptionDto])
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_by_patient(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(paciente_id): Path<i64>,
) -> Result<Json<Vec<PrescriptionDto>>, ApiError> {
    let prescriptions = state
        .prescriptions
        .list_by_patient(paciente_id)
        .await
        .or_reject(&uri)?;
    Ok(Json(prescriptions))
}

#[utoipa::path(
    get,
    path = "/api/v1/receitas/medicamento",
    params(("nome" = String, Query, description = "Medication name fragment")),
    responses(
        (status = 200, description = "Prescriptions whose medication matches", body = [PrescriptionDto])
    )
)]
#[axum::debug_handler]
pub(crate) async fn search_by_medication(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<MedicationQuery>,
) -> Result<Json<Vec<PrescriptionDto>>, ApiError> {
    let prescriptions = state
        .prescriptions
        .search_by_medication(&query.nome)
        .await
        .or_reject(&uri)?;
    Ok(Json(prescriptions))
}

#[utoipa::path(
    post,
    path = "/api/v1/receitas",
    request_body = PrescriptionDto,
    responses(
        (status = 201, description = "Prescription issued", body = PrescriptionDto),
        (status = 400, description = "Invalid payload or appointment not completed", body = crate::error::ErrorBody),
        (status = 404, description = "Appointment not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn create(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Json(dto): Json<PrescriptionDto>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    dto.validate().or_reject(&uri)?;
    let prescription = state.prescriptions.create(dto).await.or_reject(&uri)?;
    let id = prescription.id.unwrap_or_default();
    Ok(created(format!("/api/v1/receitas/{id}"), prescription))
}

#[utoipa::path(
    put,
    path = "/api/v1/receitas/{id}",
    request_body = PrescriptionDto,
    responses(
        (status = 200, description = "Prescription updated", body = PrescriptionDto),
        (status = 400, description = "Invalid payload or appointment changed", body = crate::error::ErrorBody),
        (status = 404, description = "Prescription not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn update(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
    Json(dto): Json<PrescriptionDto>,
) -> Result<Json<PrescriptionDto>, ApiError> {
    dto.validate().or_reject(&uri)?;
    let prescription = state.prescriptions.update(id, dto).await.or_reject(&uri)?;
    Ok(Json(prescription))
}

#[utoipa::path(
    delete,
    path = "/api/v1/receitas/{id}",
    responses(
        (status = 204, description = "Prescription deleted"),
        (status = 404, description = "Prescription not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn remove(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.prescriptions.delete(id).await.or_reject(&uri)?;
    Ok(StatusCode::NO_CONTENT)
}
