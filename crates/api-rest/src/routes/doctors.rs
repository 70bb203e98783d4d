//! `/api/v1/medicos` routes.

use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use hospital_core::dto::DoctorDto;

use crate::error::{ApiError, OrReject};
use crate::routes::created;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(find).put(update).delete(remove))
        .route("/busca", get(search))
        .route("/especialidade/:especialidade_id", get(list_by_specialty))
}

#[derive(Deserialize)]
pub(crate) struct NameQuery {
    nome: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/medicos",
    responses(
        (status = 200, description = "All doctors", body = [DoctorDto])
    )
)]
#[axum::debug_handler]
pub(crate) async fn list(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Vec<DoctorDto>>, ApiError> {
    let doctors = state.doctors.list_all().await.or_reject(&uri)?;
    Ok(Json(doctors))
}

#[utoipa::path(
    get,
    path = "/api/v1/medicos/{id}",
    responses(
        (status = 200, description = "Doctor found", body = DoctorDto),
        (status = 404, description = "Doctor not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn find(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> Result<Json<DoctorDto>, ApiError> {
    let doctor = state.doctors.find_by_id(id).await.or_reject(&uri)?;
    Ok(Json(doctor))
}

#[utoipa::path(
    get,
    path = "/api/v1/medicos/busca",
    params(("nome" = String, Query, description = "Name fragment to match")),
    responses(
        (status = 200, description = "Doctors whose name contains the fragment", body = [DoctorDto])
    )
)]
#[axum::debug_handler]
pub(crate) async fn search(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<NameQuery>,
) -> Result<Json<Vec<DoctorDto>>, ApiError> {
    let doctors = state.doctors.search_by_name(&query.nome).await.or_reject(&uri)?;
    Ok(Json(doctors))
}

#[utoipa::path(
    get,
    path = "/api/v1/medicos/especialidade/{especialidadeId}",
    responses(
        (status = 200, description = "Doctors holding the specialty", body = [DoctorDto])
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_by_specialty(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(especialidade_id): Path<i64>,
) -> Result<Json<Vec<DoctorDto>>, ApiError> {
    let doctors = state
        .doctors
        .list_by_specialty(especialidade_id)
        .await
        .or_reject(&uri)?;
    Ok(Json(doctors))
}

#[utoipa::path(
    post,
    path = "/api/v1/medicos",
    request_body = DoctorDto,
    responses(
        (status = 201, description = "Doctor created", body = DoctorDto),
        (status = 400, description = "Invalid payload or duplicate CRM", body = crate::error::ErrorBody),
        (status = 404, description = "Referenced specialty not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn create(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Json(dto): Json<DoctorDto>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    dto.validate().or_reject(&uri)?;
    let doctor = state.doctors.create(dto).await.or_reject(&uri)?;
    let id = doctor.id.unwrap_or_default();
    Ok(created(format!("/api/v1/medicos/{id}"), doctor))
}

#[utoipa::path(
    put,
    path = "/api/v1/medicos/{id}",
    request_body = DoctorDto,
    responses(
        (status = 200, description = "Doctor updated", body = DoctorDto),
        (status = 400, description = "Invalid payload or duplicate CRM", body = crate::error::ErrorBody),
        (status = 404, description = "Doctor or referenced specialty not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn update(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
    Json(dto): Json<DoctorDto>,
) -> Result<Json<DoctorDto>, ApiError> {
    dto.validate().or_reject(&uri)?;
    let doctor = state.doctors.update(id, dto).await.or_reject(&uri)?;
    Ok(Json(doctor))
}

#[utoipa::path(
    delete,
    path = "/api/v1/medicos/{id}",
    responses(
        (status = 204, description = "Doctor deleted"),
        (status = 400, description = "Doctor still has appointments", body = crate::error::ErrorBody),
        (status = 404, description = "Doctor not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn remove(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.doctors.delete(id).await.or_reject(&uri)?;
    Ok(StatusCode::NO_CONTENT)
}
