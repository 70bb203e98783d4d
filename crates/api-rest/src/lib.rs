//! # API REST
//!
//! REST surface of the hospital management system.
//!
//! Handles:
//! - HTTP endpoints with axum, nested under `/api/v1`
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, status mapping, CORS)
//!
//! All business rules live in `hospital-core`; the handlers here only
//! translate between HTTP and the services.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod routes;

use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use hospital_core::dto::{
    AppointmentDto, DoctorDto, ExamDto, MedicalRecordDto, PatientDto, PrescriptionDto,
    SpecialtyDto,
};
use hospital_core::models::{AppointmentStatus, ExamType};
use hospital_core::{
    AppointmentService, DoctorService, ExamService, MedicalRecordService, PatientService,
    PrescriptionService, SpecialtyService,
};

/// Shared state handed to every request handler: one service per
/// resource, all cloning the same connection pool.
#[derive(Clone)]
pub struct AppState {
    pub specialties: SpecialtyService,
    pub doctors: DoctorService,
    pub patients: PatientService,
    pub appointments: AppointmentService,
    pub medical_records: MedicalRecordService,
    pub prescriptions: PrescriptionService,
    pub exams: ExamService,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            specialties: SpecialtyService::new(pool.clone()),
            doctors: DoctorService::new(pool.clone()),
            patients: PatientService::new(pool.clone()),
            appointments: AppointmentService::new(pool.clone()),
            medical_records: MedicalRecordService::new(pool.clone()),
            prescriptions: PrescriptionService::new(pool.clone()),
            exams: ExamService::new(pool),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        routes::specialties::list,
        routes::specialties::find,
        routes::specialties::find_by_name,
        routes::specialties::list_by_doctor,
        routes::specialties::create,
        routes::specialties::update,
        routes::specialties::remove,
        routes::doctors::list,
        routes::doctors::find,
        routes::doctors::search,
        routes::doctors::list_by_specialty,
        routes::doctors::create,
        routes::doctors::update,
        routes::doctors::remove,
        routes::patients::list,
        routes::patients::find,
        routes::patients::search,
        routes::patients::find_by_cpf,
        routes::patients::create,
        routes::patients::update,
        routes::patients::remove,
        routes::appointments::list,
        routes::appointments::find,
        routes::appointments::list_by_doctor,
        routes::appointments::list_by_patient,
        routes::appointments::list_by_status,
        routes::appointments::list_by_period,
        routes::appointments::create,
        routes::appointments::update,
        routes::appointments::cancel,
        routes::appointments::complete,
        routes::appointments::remove,
        routes::medical_records::list,
        routes::medical_records::find,
        routes::medical_records::find_by_appointment,
        routes::medical_records::list_by_patient,
        routes::medical_records::create,
        routes::medical_records::update,
        routes::medical_records::remove,
        routes::prescriptions::list,
        routes::prescriptions::find,
        routes::prescriptions::list_by_appointment,
        routes::prescriptions::list_by_patient,
        routes::prescriptions::search_by_medication,
        routes::prescriptions::create,
        routes::prescriptions::update,
        routes::prescriptions::remove,
        routes::exams::list,
        routes::exams::find,
        routes::exams::list_by_appointment,
        routes::exams::list_by_patient,
        routes::exams::list_by_type,
        routes::exams::list_pending,
        routes::exams::create,
        routes::exams::update,
        routes::exams::register_result,
        routes::exams::remove,
    ),
    components(schemas(
        HealthRes,
        SpecialtyDto,
        DoctorDto,
        PatientDto,
        AppointmentDto,
        MedicalRecordDto,
        PrescriptionDto,
        ExamDto,
        AppointmentStatus,
        ExamType,
        error::ErrorBody,
    ))
)]
struct ApiDoc;

/// Build the full application router over the given state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1/especialidades", routes::specialties::router())
        .nest("/api/v1/medicos", routes::doctors::router())
        .nest("/api/v1/pacientes", routes::patients::router())
        .nest("/api/v1/consultas", routes::appointments::router())
        .nest("/api/v1/prontuarios", routes::medical_records::router())
        .nest("/api/v1/receitas", routes::prescriptions::router())
        .nest("/api/v1/exames", routes::exams::router())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint, used for monitoring and load balancer probes.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "hospital REST API is alive".into(),
    })
}
