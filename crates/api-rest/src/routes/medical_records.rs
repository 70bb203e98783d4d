//! `/api/v1/prontuarios` routes.

use axum::extract::{OriginalUri, Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;

use hospital_core::dto::MedicalRecordDto;

use crate::error::{ApiError, OrReject};
use crate::routes::created;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(find).put(update).delete(remove))
        .route("/consulta/:consulta_id", get(find_by_appointment))
        .route("/paciente/:paciente_id", get(list_by_patient))
}

#[utoipa::path(
    get,
    path = "/api/v1/prontuarios",
    responses(
        (status = 200, description = "All medical records", body = [MedicalRecordDto])
    )
)]
#[axum::debug_handler]
pub(crate) async fn list(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Vec<MedicalRecordDto>>, ApiError> {
    let records = state.medical_records.list_all().await.or_reject(&uri)?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/v1/prontuarios/{id}",
    responses(
        (status = 200, description = "Medical record found", body = MedicalRecordDto),
        (status = 404, description = "Medical record not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn find(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> Result<Json<MedicalRecordDto>, ApiError> {
    let record = state.medical_records.find_by_id(id).await.or_reject(&uri)?;
    Ok(Json(record))
}

#[utoipa::path(
    get,
    path = "/api/v1/prontuarios/consulta/{consultaId}",
    responses(
        (status = 200, description = "The appointment's medical record", body = MedicalRecordDto),
        (status = 404, description = "No record for the appointment", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn find_by_appointment(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(consulta_id): Path<i64>,
) -> Result<Json<MedicalRecordDto>, ApiError> {
    let record = state
        .medical_records
        .find_by_appointment(consulta_id)
        .await
        .or_reject(&uri)?;
    Ok(Json(record))
}

#[utoipa::path(
    get,
    path = "/api/v1/prontuarios/paciente/{pacienteId}",
    responses(
        (status = 200, description = "The patient's records, newest first", body = [MedicalRecordDto])
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_by_patient(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(paciente_id): Path<i64>,
) -> Result<Json<Vec<MedicalRecordDto>>, ApiError> {
    let records = state
        .medical_records
        .list_by_patient(paciente_id)
        .await
        .or_reject(&uri)?;
    Ok(Json(records))
}

#[utoipa::path(
    post,
    path = "/api/v1/prontuarios",
    request_body = MedicalRecordDto,
    responses(
        (status = 201, description = "Medical record created", body = MedicalRecordDto),
        (status = 400, description = "Appointment not completed or already has a record", body = crate::error::ErrorBody),
        (status = 404, description = "Appointment not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn create(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Json(dto): Json<MedicalRecordDto>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    dto.validate().or_reject(&uri)?;
    let record = state.medical_records.create(dto).await.or_reject(&uri)?;
    let id = record.id.unwrap_or_default();
    Ok(created(format!("/api/v1/prontuarios/{id}"), record))
}

#[utoipa::path(
    put,
    path = "/api/v1/prontuarios/{id}",
    request_body = MedicalRecordDto,
    responses(
        (status = 200, description = "Medical record updated", body = MedicalRecordDto),
        (status = 400, description = "Invalid payload or appointment changed", body = crate::error::ErrorBody),
        (status = 404, description = "Medical record not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn update(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
    Json(dto): Json<MedicalRecordDto>,
) -> Result<Json<MedicalRecordDto>, ApiError> {
    dto.validate().or_reject(&uri)?;
    let record = state.medical_records.update(id, dto).await.or_reject(&uri)?;
    Ok(Json(record))
}

#[utoipa::path(
    delete,
    path = "/api/v1/prontuarios/{id}",
    responses(
        (status = 204, description = "Medical record deleted"),
        (status = 404, description = "Medical record not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn remove(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.medical_records.delete(id).await.or_reject(&uri)?;
    Ok(StatusCode::NO_CONTENT)
}
