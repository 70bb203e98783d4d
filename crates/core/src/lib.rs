//! # Hospital Core
//!
//! Core business logic for the hospital management system.
//!
//! This crate contains the domain model and persistence operations:
//! - Entity and transfer-record definitions for the seven resources
//!   (specialties, doctors, patients, appointments, medical records,
//!   prescriptions, exams)
//! - Thin per-entity query layers over SQLite
//! - Services enforcing the business rules (appointment lifecycle,
//!   referential guards, uniqueness pre-checks) inside transactions
//!
//! **No API concerns**: HTTP routing, status-code mapping and OpenAPI
//! metadata belong in `api-rest`.

pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;
pub mod validate;

pub use config::AppConfig;
pub use error::{HospitalError, HospitalResult};
pub use services::appointments::AppointmentService;
pub use services::doctors::DoctorService;
pub use services::exams::ExamService;
pub use services::medical_records::MedicalRecordService;
pub use services::patients::PatientService;
pub use services::prescriptions::PrescriptionService;
pub use services::specialties::SpecialtyService;
