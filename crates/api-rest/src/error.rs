//! HTTP error mapping.
//!
//! Every failure leaves the API as the same JSON body:
//! `{timestamp, status, message, path, errors}`. Business-rule conflicts
//! and validation failures map to 400, missing resources to 404 and
//! storage failures to 500 (with the underlying message surfaced in
//! `errors`).

use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use hospital_core::{HospitalError, HospitalResult};

/// Wire shape of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub timestamp: NaiveDateTime,
    pub status: u16,
    pub message: String,
    pub path: String,
    pub errors: Vec<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn from_core(err: HospitalError, path: &str) -> Self {
        let (status, message, errors) = match err {
            not_found @ HospitalError::NotFound(_) => {
                (StatusCode::NOT_FOUND, not_found.to_string(), Vec::new())
            }
            HospitalError::Conflict(message) => (StatusCode::BAD_REQUEST, message, Vec::new()),
            HospitalError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, "validation failed".to_owned(), errors)
            }
            HospitalError::Database(source) => {
                tracing::error!(error = %source, "database failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                    vec![source.to_string()],
                )
            }
        };
        Self {
            status,
            body: ErrorBody {
                timestamp: Local::now().naive_local(),
                status: status.as_u16(),
                message,
                path: path.to_owned(),
                errors,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Shorthand used by the handlers to attach the request path.
pub(crate) trait OrReject<T> {
    fn or_reject(self, uri: &Uri) -> Result<T, ApiError>;
}

impl<T> OrReject<T> for HospitalResult<T> {
    fn or_reject(self, uri: &Uri) -> Result<T, ApiError> {
        self.map_err(|err| ApiError::from_core(err, uri.path()))
    }
}
