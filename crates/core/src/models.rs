//! Persisted entities and their enums.
//!
//! Relations are plain foreign-key columns; nothing here holds an object
//! graph. The two enums keep the wire names the original clients already
//! speak (`AGENDADA`/`REALIZADA`/`CANCELADA`, `LABORATORIAL`/`IMAGEM`/
//! `OUTROS`) both in JSON and in the database.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::HospitalError;

/// Lifecycle status of an appointment.
///
/// SCHEDULED is the only non-terminal state: an appointment moves to
/// COMPLETED or CANCELED exactly once and never leaves either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
pub enum AppointmentStatus {
    #[serde(rename = "AGENDADA")]
    #[sqlx(rename = "AGENDADA")]
    Scheduled,
    #[serde(rename = "REALIZADA")]
    #[sqlx(rename = "REALIZADA")]
    Completed,
    #[serde(rename = "CANCELADA")]
    #[sqlx(rename = "CANCELADA")]
    Canceled,
}

impl AppointmentStatus {
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Scheduled => "AGENDADA",
            Self::Completed => "REALIZADA",
            Self::Canceled => "CANCELADA",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = HospitalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AGENDADA" => Ok(Self::Scheduled),
            "REALIZADA" => Ok(Self::Completed),
            "CANCELADA" => Ok(Self::Canceled),
            other => Err(HospitalError::Validation(vec![format!(
                "status: '{other}' is not one of AGENDADA, REALIZADA, CANCELADA"
            )])),
        }
    }
}

/// Kind of diagnostic exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
pub enum ExamType {
    #[serde(rename = "LABORATORIAL")]
    #[sqlx(rename = "LABORATORIAL")]
    Lab,
    #[serde(rename = "IMAGEM")]
    #[sqlx(rename = "IMAGEM")]
    Imaging,
    #[serde(rename = "OUTROS")]
    #[sqlx(rename = "OUTROS")]
    Other,
}

impl ExamType {
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Lab => "LABORATORIAL",
            Self::Imaging => "IMAGEM",
            Self::Other => "OUTROS",
        }
    }
}

impl std::fmt::Display for ExamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl std::str::FromStr for ExamType {
    type Err = HospitalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LABORATORIAL" => Ok(Self::Lab),
            "IMAGEM" => Ok(Self::Imaging),
            "OUTROS" => Ok(Self::Other),
            other => Err(HospitalError::Validation(vec![format!(
                "tipo: '{other}' is not one of LABORATORIAL, IMAGEM, OUTROS"
            )])),
        }
    }
}

/// Medical field of practice; many-to-many with doctors.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Specialty {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub crm: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub cpf: String,
    pub birth_date: NaiveDate,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// A scheduled meeting between one doctor and one patient.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Appointment {
    pub id: i64,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub date_time: NaiveDateTime,
    pub status: AppointmentStatus,
    pub note: Option<String>,
}

/// Clinical note attached to a completed appointment; at most one per
/// appointment.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MedicalRecord {
    pub id: i64,
    pub appointment_id: i64,
    pub anamnesis: String,
    pub diagnosis: Option<String>,
    pub treatment_plan: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Prescription {
    pub id: i64,
    pub appointment_id: i64,
    pub medication: String,
    pub dosage: String,
    pub notes: Option<String>,
    pub issued_at: NaiveDateTime,
    pub valid_until: NaiveDateTime,
}

/// Diagnostic test request; `result` and `result_at` are set together
/// when a result is registered.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Exam {
    pub id: i64,
    pub appointment_id: i64,
    pub name: String,
    pub exam_type: ExamType,
    pub instructions: Option<String>,
    pub requested_at: NaiveDateTime,
    pub result: Option<String>,
    pub result_at: Option<NaiveDateTime>,
}
