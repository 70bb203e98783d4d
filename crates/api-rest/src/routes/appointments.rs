//! `/api/v1/consultas` routes.
//!
//! Besides CRUD, two lifecycle endpoints: `PUT /{id}/cancelar` and
//! `PUT /{id}/realizar`.

use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, put};
use axum::Router;
use chrono::NaiveDateTime;
use serde::Deserialize;

use hospital_core::dto::AppointmentDto;
use hospital_core::models::AppointmentStatus;
use hospital_core::HospitalError;

use crate::error::{ApiError, OrReject};
use crate::routes::created;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(find).put(update).delete(remove))
        .route("/:id/cancelar", put(cancel))
        .route("/:id/realizar", put(complete))
        .route("/medico/:medico_id", get(list_by_doctor))
        .route("/paciente/:paciente_id", get(list_by_patient))
        .route("/status/:status", get(list_by_status))
        .route("/periodo", get(list_by_period))
}

#[derive(Deserialize)]
pub(crate) struct PeriodQuery {
    inicio: String,
    fim: String,
}

fn parse_bound(field: &str, value: &str) -> Result<NaiveDateTime, HospitalError> {
    value.parse().map_err(|_| {
        HospitalError::Validation(vec![format!("{field}: must be an ISO-8601 date-time")])
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/consultas",
    responses(
        (status = 200, description = "All appointments", body = [AppointmentDto])
    )
)]
#[axum::debug_handler]
pub(crate) async fn list(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Vec<AppointmentDto>>, ApiError> {
    let appointments = state.appointments.list_all().await.or_reject(&uri)?;
    Ok(Json(appointments))
}

#[utoipa::path(
    get,
    path = "/api/v1/consultas/{id}",
    responses(
        (status = 200, description = "Appointment found", body = AppointmentDto),
        (status = 404, description = "Appointment not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn find(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> Result<Json<AppointmentDto>, ApiError> {
    let appointment = state.appointments.find_by_id(id).await.or_reject(&uri)?;
    Ok(Json(appointment))
}

#[utoipa::path(
    get,
    path = "/api/v1/consultas/medico/{medicoId}",
    responses(
        (status = 200, description = "Appointments of the doctor, soonest first", body = [AppointmentDto])
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_by_doctor(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(medico_id): Path<i64>,
) -> Result<Json<Vec<AppointmentDto>>, ApiError> {
    let appointments = state.appointments.list_by_doctor(medico_id).await.or_reject(&uri)?;
    Ok(Json(appointments))
}

#[utoipa::path(
    get,
    path = "/api/v1/consultas/paciente/{pacienteId}",
    responses(
        (status = 200, description = "Appointments of the patient, soonest first", body = [AppointmentDto])
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_by_patient(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(paciente_id): Path<i64>,
) -> Result<Json<Vec<AppointmentDto>>, ApiError> {
    let appointments = state
        .appointments
        .list_by_patient(paciente_id)
        .await
        .or_reject(&uri)?;
    Ok(Json(appointments))
}

#[utoipa::path(
    get,
    path = "/api/v1/consultas/status/{status}",
    params(("status" = AppointmentStatus, Path, description = "AGENDADA, REALIZADA or CANCELADA")),
    responses(
        (status = 200, description = "Appointments in the given status", body = [AppointmentDto]),
        (status = 400, description = "Unknown status value", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_by_status(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(status): Path<String>,
) -> Result<Json<Vec<AppointmentDto>>, ApiError> {
    let status = status.parse::<AppointmentStatus>().or_reject(&uri)?;
    let appointments = state.appointments.list_by_status(status).await.or_reject(&uri)?;
    Ok(Json(appointments))
}

#[utoipa::path(
    get,
    path = "/api/v1/consultas/periodo",
    params(
        ("inicio" = String, Query, description = "Range start, ISO-8601"),
        ("fim" = String, Query, description = "Range end, ISO-8601")
    ),
    responses(
        (status = 200, description = "Appointments inside the range", body = [AppointmentDto]),
        (status = 400, description = "Malformed bound", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_by_period(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<Vec<AppointmentDto>>, ApiError> {
    let start = parse_bound("inicio", &query.inicio).or_reject(&uri)?;
    let end = parse_bound("fim", &query.fim).or_reject(&uri)?;
    let appointments = state
        .appointments
        .list_by_date_range(start, end)
        .await
        .or_reject(&uri)?;
    Ok(Json(appointments))
}

#[utoipa::path(
    post,
    path = "/api/v1/consultas",
    request_body = AppointmentDto,
    responses(
        (status = 201, description = "Appointment scheduled", body = AppointmentDto),
        (status = 400, description = "Past date or occupied slot", body = crate::error::ErrorBody),
        (status = 404, description = "Doctor or patient not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn create(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Json(dto): Json<AppointmentDto>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    dto.validate().or_reject(&uri)?;
    let appointment = state.appointments.create(dto).await.or_reject(&uri)?;
    let id = appointment.id.unwrap_or_default();
    Ok(created(format!("/api/v1/consultas/{id}"), appointment))
}

#[utoipa::path(
    put,
    path = "/api/v1/consultas/{id}",
    request_body = AppointmentDto,
    responses(
        (status = 200, description = "Appointment updated", body = AppointmentDto),
        (status = 400, description = "Terminal status, past date or occupied slot", body = crate::error::ErrorBody),
        (status = 404, description = "Appointment, doctor or patient not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn update(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
    Json(dto): Json<AppointmentDto>,
) -> Result<Json<AppointmentDto>, ApiError> {
    dto.validate().or_reject(&uri)?;
    let appointment = state.appointments.update(id, dto).await.or_reject(&uri)?;
    Ok(Json(appointment))
}

#[utoipa::path(
    put,
    path = "/api/v1/consultas/{id}/cancelar",
    responses(
        (status = 200, description = "Appointment canceled", body = AppointmentDto),
        (status = 400, description = "Already completed or canceled", body = crate::error::ErrorBody),
        (status = 404, description = "Appointment not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn cancel(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> Result<Json<AppointmentDto>, ApiError> {
    let appointment = state.appointments.cancel(id).await.or_reject(&uri)?;
    Ok(Json(appointment))
}

#[utoipa::path(
    put,
    path = "/api/v1/consultas/{id}/realizar",
    responses(
        (status = 200, description = "Appointment completed", body = AppointmentDto),
        (status = 400, description = "Already completed or canceled", body = crate::error::ErrorBody),
        (status = 404, description = "Appointment not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn complete(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> Result<Json<AppointmentDto>, ApiError> {
    let appointment = state.appointments.complete(id).await.or_reject(&uri)?;
    Ok(Json(appointment))
}

#[utoipa::path(
    delete,
    path = "/api/v1/consultas/{id}",
    responses(
        (status = 204, description = "Appointment deleted"),
        (status = 400, description = "Completed or still referenced", body = crate::error::ErrorBody),
        (status = 404, description = "Appointment not found", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub(crate) async fn remove(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.appointments.delete(id).await.or_reject(&uri)?;
    Ok(StatusCode::NO_CONTENT)
}
