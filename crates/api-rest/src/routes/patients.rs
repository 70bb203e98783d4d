//! `/api/v1/pacientes` routes.

use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use hospital_core::dto::PatientDto;

use crate::error::{ApiError, OrReject};
use crate::routes::created;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(find).put(update).delete(remove))
        .route("/busca", get(search))
        .route("/cpf/:cpf", get(find_by_cpf))
}

#[derive(Deserialize)]
pub(crate) struct NameQuery {
    nome: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/pacientes",
    responses(
        (status = 200, description = "All patients", body = [PatientDto])
    )
)]
#[axum::debug_handler]
pub(crate) async fn list(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Vec<PatientDto>>, ApiError> {
    let patients = state.patients.list_all().await.or_reject(&uri)?;
    Ok(Json(patients))
}

#[utoipa::path(
    get,
    path = "/api/v1/pacientes/{id}",
    responses(
        (status = 200, description = "Patient found", body = PatientDto),
        (status = 404, description = "Patient not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn find(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> Result<Json<PatientDto>, ApiError> {
    let patient = state.patients.find_by_id(id).await.or_reject(&uri)?;
    Ok(Json(patient))
}

#[utoipa::path(
    get,
    path = "/api/v1/pacientes/busca",
    params(("nome" = String, Query, description = "Name fragment to match")),
    responses(
        (status = 200, description = "Patients whose name contains the fragment", body = [PatientDto])
    )
)]
#[axum::debug_handler]
pub(crate) async fn search(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<NameQuery>,
) -> Result<Json<Vec<PatientDto>>, ApiError> {
    let patients = state.patients.search_by_name(&query.nome).await.or_reject(&uri)?;
    Ok(Json(patients))
}

#[utoipa::path(
    get,
    path = "/api/v1/pacientes/cpf/{cpf}",
    responses(
        (status = 200, description = "Patient found", body = PatientDto),
        (status = 404, description = "No patient with the given CPF", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn find_by_cpf(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(cpf): Path<String>,
) -> Result<Json<PatientDto>, ApiError> {
    let patient = state.patients.find_by_cpf(&cpf).await.or_reject(&uri)?;
    Ok(Json(patient))
}

#[utoipa::path(
    post,
    path = "/api/v1/pacientes",
    request_body = PatientDto,
    responses(
        (status = 201, description = "Patient created", body = PatientDto),
        (status = 400, description = "Invalid payload or duplicate CPF", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn create(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Json(dto): Json<PatientDto>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    dto.validate().or_reject(&uri)?;
    let patient = state.patients.create(dto).await.or_reject(&uri)?;
    let id = patient.id.unwrap_or_default();
    Ok(created(format!("/api/v1/pacientes/{id}"), patient))
}

#[utoipa::path(
    put,
    path = "/api/v1/pacientes/{id}",
    request_body = PatientDto,
    responses(
        (status = 200, description = "Patient updated", body = PatientDto),
        (status = 400, description = "Invalid payload or duplicate CPF", body = crate::error::ErrorBody),
        (status = 404, description = "Patient not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn update(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
    Json(dto): Json<PatientDto>,
) -> Result<Json<PatientDto>, ApiError> {
    dto.validate().or_reject(&uri)?;
    let patient = state.patients.update(id, dto).await.or_reject(&uri)?;
    Ok(Json(patient))
}

#[utoipa::path(
    delete,
    path = "/api/v1/pacientes/{id}",
    responses(
        (status = 204, description = "Patient deleted"),
        (status = 400, description = "Patient still has appointments", body = crate::error::ErrorBody),
        (status = 404, description = "Patient not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn remove(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.patients.delete(id).await.or_reject(&uri)?;
    Ok(StatusCode::NO_CONTENT)
}
