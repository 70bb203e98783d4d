//! Per-resource routers.
//!
//! One module per resource, each exposing a `router()` that the
//! application nests under its `/api/v1` segment. Handlers validate the
//! payload, call the matching service and map failures through
//! [`crate::error::ApiError`].

pub mod appointments;
pub mod doctors;
pub mod exams;
pub mod medical_records;
pub mod patients;
pub mod prescriptions;
pub mod specialties;

use axum::http::{header, HeaderName, StatusCode};
use axum::response::Json;
use serde::Serialize;

/// 201 with a `Location` header pointing at the created resource.
pub(crate) fn created<T: Serialize>(
    location: String,
    body: T,
) -> (StatusCode, [(HeaderName, String); 1], Json<T>) {
    (StatusCode::CREATED, [(header::LOCATION, location)], Json(body))
}
