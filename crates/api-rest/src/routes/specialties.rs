//! `/api/v1/especialidades` routes.

use axum::extract::{OriginalUri, Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;

use hospital_core::dto::SpecialtyDto;

use crate::error::{ApiError, OrReject};
use crate::routes::created;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(find).put(update).delete(remove))
        .route("/nome/:nome", get(find_by_name))
        .route("/medico/:medico_id", get(list_by_doctor))
}

#[utoipa::path(
    get,
    path = "/api/v1/especialidades",
    responses(
        (status = 200, description = "All specialties", body = [SpecialtyDto])
    )
)]
#[axum::debug_handler]
pub(crate) async fn list(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Vec<SpecialtyDto>>, ApiError> {
    let specialties = state.specialties.list_all().await.or_reject(&uri)?;
    Ok(Json(specialties))
}

#[utoipa::path(
    get,
    path = "/api/v1/especialidades/{id}",
    responses(
        (status = 200, description = "Specialty found", body = SpecialtyDto),
        (status = 404, description = "Specialty not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn find(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> Result<Json<SpecialtyDto>, ApiError> {
    let specialty = state.specialties.find_by_id(id).await.or_reject(&uri)?;
    Ok(Json(specialty))
}

#[utoipa::path(
    get,
    path = "/api/v1/especialidades/nome/{nome}",
    responses(
        (status = 200, description = "Specialty found", body = SpecialtyDto),
        (status = 404, description = "Specialty not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn find_by_name(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(nome): Path<String>,
) -> Result<Json<SpecialtyDto>, ApiError> {
    let specialty = state.specialties.find_by_name(&nome).await.or_reject(&uri)?;
    Ok(Json(specialty))
}

#[utoipa::path(
    get,
    path = "/api/v1/especialidades/medico/{medicoId}",
    responses(
        (status = 200, description = "Specialties held by the doctor", body = [SpecialtyDto])
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_by_doctor(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(medico_id): Path<i64>,
) -> Result<Json<Vec<SpecialtyDto>>, ApiError> {
    let specialties = state.specialties.list_by_doctor(medico_id).await.or_reject(&uri)?;
    Ok(Json(specialties))
}

#[utoipa::path(
    post,
    path = "/api/v1/especialidades",
    request_body = SpecialtyDto,
    responses(
        (status = 201, description = "Specialty created", body = SpecialtyDto),
        (status = 400, description = "Invalid payload or duplicate name", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn create(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Json(dto): Json<SpecialtyDto>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    dto.validate().or_reject(&uri)?;
    let specialty = state.specialties.create(dto).await.or_reject(&uri)?;
    let id = specialty.id.unwrap_or_default();
    Ok(created(format!("/api/v1/especialidades/{id}"), specialty))
}

#[utoipa::path(
    put,
    path = "/api/v1/especialidades/{id}",
    request_body = SpecialtyDto,
    responses(
        (status = 200, description = "Specialty updated", body = SpecialtyDto),
        (status = 400, description = "Invalid payload or duplicate name", body = crate::error::ErrorBody),
        (status = 404, description = "Specialty not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn update(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
    Json(dto): Json<SpecialtyDto>,
) -> Result<Json<SpecialtyDto>, ApiError> {
    dto.validate().or_reject(&uri)?;
    let specialty = state.specialties.update(id, dto).await.or_reject(&uri)?;
    Ok(Json(specialty))
}

#[utoipa::path(
    delete,
    path = "/api/v1/especialidades/{id}",
    responses(
        (status = 204, description = "Specialty deleted"),
        (status = 400, description = "Specialty still held by doctors", body = crate::error::ErrorBody),
        (status = 404, description = "Specialty not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn remove(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.specialties.delete(id).await.or_reject(&uri)?;
    Ok(StatusCode::NO_CONTENT)
}
