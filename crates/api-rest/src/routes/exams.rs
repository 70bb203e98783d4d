//! `/api/v1/exames` routes.
//!
//! `PUT /{id}/resultado?resultado=` records the outcome of an exam.

use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, put};
use axum::Router;
use serde::Deserialize;

use hospital_core::dto::ExamDto;
use hospital_core::models::ExamType;

use crate::error::{ApiError, OrReject};
use crate::routes::created;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(find).put(update).delete(remove))
        .route("/:id/resultado", put(register_result))
        .route("/consulta/:consulta_id", get(list_by_appointment))
        .route("/paciente/:paciente_id", get(list_by_patient))
        .route("/tipo/:tipo", get(list_by_type))
        .route("/pendentes", get(list_pending))
}

#[derive(Deserialize)]
pub(crate) struct ResultQuery {
    resultado: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/exames",
    responses(
        (status = 200, description = "All exams", body = [ExamDto])
    )
)]
#[axum::debug_handler]
pub(crate) async fn list(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Vec<ExamDto>>, ApiError> {
    let exams = state.exams.list_all().await.or_reject(&uri)?;
    Ok(Json(exams))
}

#[utoipa::path(
    get,
    path = "/api/v1/exames/{id}",
    responses(
        (status = 200, description = "Exam found", body = ExamDto),
        (status = 404, description = "Exam not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn find(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> Result<Json<ExamDto>, ApiError> {
    let exam = state.exams.find_by_id(id).await.or_reject(&uri)?;
    Ok(Json(exam))
}

#[utoipa::path(
    get,
    path = "/api/v1/exames/consulta/{consultaId}",
    responses(
        (status = 200, description = "Exams requested in the appointment", body = [ExamDto])
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_by_appointment(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(consulta_id): Path<i64>,
) -> Result<Json<Vec<ExamDto>>, ApiError> {
    let exams = state.exams.list_by_appointment(consulta_id).await.or_reject(&uri)?;
    Ok(Json(exams))
}

#[utoipa::path(
    get,
    path = "/api/v1/exames/paciente/{pacienteId}",
    responses(
        (status = 200, description = "Exams across the patient's appointments", body = [ExamDto])
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_by_patient(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(paciente_id): Path<i64>,
) -> Result<Json<Vec<ExamDto>>, ApiError> {
    let exams = state.exams.list_by_patient(paciente_id).await.or_reject(&uri)?;
    Ok(Json(exams))
}

#[utoipa::path(
    get,
    path = "/api/v1/exames/tipo/{tipo}",
    params(("tipo" = ExamType, Path, description = "LABORATORIAL, IMAGEM or OUTROS")),
    responses(
        (status = 200, description = "Exams of the given type", body = [ExamDto]),
        (status = 400, description = "Unknown exam type", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_by_type(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(tipo): Path<String>,
) -> Result<Json<Vec<ExamDto>>, ApiError> {
    let exam_type = tipo.parse::<ExamType>().or_reject(&uri)?;
    let exams = state.exams.list_by_type(exam_type).await.or_reject(&uri)?;
    Ok(Json(exams))
}

#[utoipa::path(
    get,
    path = "/api/v1/exames/pendentes",
    responses(
        (status = 200, description = "Exams still waiting for a result", body = [ExamDto])
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_pending(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Vec<ExamDto>>, ApiError> {
    let exams = state.exams.list_pending().await.or_reject(&uri)?;
    Ok(Json(exams))
}

#[utoipa::path(
    post,
    path = "/api/v1/exames",
    request_body = ExamDto,
    responses(
        (status = 201, description = "Exam requested", body = ExamDto),
        (status = 400, description = "Invalid payload or appointment not completed", body = crate::error::ErrorBody),
        (status = 404, description = "Appointment not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn create(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Json(dto): Json<ExamDto>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    dto.validate().or_reject(&uri)?;
    let exam = state.exams.create(dto).await.or_reject(&uri)?;
    let id = exam.id.unwrap_or_default();
    Ok(created(format!("/api/v1/exames/{id}"), exam))
}

#[utoipa::path(
    put,
    path = "/api/v1/exames/{id}",
    request_body = ExamDto,
    responses(
        (status = 200, description = "Exam updated", body = ExamDto),
        (status = 400, description = "Invalid payload or appointment changed", body = crate::error::ErrorBody),
        (status = 404, description = "Exam not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn update(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
    Json(dto): Json<ExamDto>,
) -> Result<Json<ExamDto>, ApiError> {
    dto.validate().or_reject(&uri)?;
    let exam = state.exams.update(id, dto).await.or_reject(&uri)?;
    Ok(Json(exam))
}

#[utoipa::path(
    put,
    path = "/api/v1/exames/{id}/resultado",
    params(("resultado" = String, Query, description = "Outcome text, must not be blank")),
    responses(
        (status = 200, description = "Result registered", body = ExamDto),
        (status = 400, description = "Blank result", body = crate::error::ErrorBody),
        (status = 404, description = "Exam not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn register_result(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
    Query(query): Query<ResultQuery>,
) -> Result<Json<ExamDto>, ApiError> {
    let exam = state
        .exams
        .register_result(id, &query.resultado)
        .await
        .or_reject(&uri)?;
    Ok(Json(exam))
}

#[utoipa::path(
    delete,
    path = "/api/v1/exames/{id}",
    responses(
        (status = 204, description = "Exam deleted"),
        (status = 404, description = "Exam not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn remove(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.exams.delete(id).await.or_reject(&uri)?;
    Ok(StatusCode::NO_CONTENT)
}
