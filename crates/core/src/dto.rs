//! Transfer records for the HTTP layer.
//!
//! One record per entity, used both as request payload and response body
//! (the id is server-assigned and ignored on input). JSON field names are
//! camelCase; timestamps assigned server-side are optional on input and
//! always present on output.

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::HospitalResult;
use crate::models::{
    Appointment, AppointmentStatus, Doctor, Exam, ExamType, MedicalRecord, Patient, Prescription,
    Specialty,
};
use crate::validate::FieldErrors;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpecialtyDto {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
}

impl SpecialtyDto {
    pub fn from_entity(specialty: Specialty) -> Self {
        Self {
            id: Some(specialty.id),
            name: specialty.name,
            description: specialty.description,
        }
    }

    pub fn validate(&self) -> HospitalResult<()> {
        let mut errors = FieldErrors::new();
        errors.require_text("name", &self.name, 1, 100);
        errors.require_text("description", &self.description, 1, 500);
        errors.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDto {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub crm: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub specialty_ids: Vec<i64>,
}

impl DoctorDto {
    pub fn from_entity(doctor: Doctor, mut specialty_ids: Vec<i64>) -> Self {
        specialty_ids.sort_unstable();
        Self {
            id: Some(doctor.id),
            name: doctor.name,
            crm: doctor.crm,
            email: doctor.email,
            phone: doctor.phone,
            specialty_ids,
        }
    }

    pub fn validate(&self) -> HospitalResult<()> {
        let mut errors = FieldErrors::new();
        errors.require_text("name", &self.name, 3, 100);
        errors.require_digits("crm", &self.crm, 4, 6);
        errors.require_email("email", &self.email);
        errors.require_digits("phone", &self.phone, 10, 11);
        errors.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientDto {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub cpf: String,
    pub birth_date: NaiveDate,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl PatientDto {
    pub fn from_entity(patient: Patient) -> Self {
        Self {
            id: Some(patient.id),
            name: patient.name,
            cpf: patient.cpf,
            birth_date: patient.birth_date,
            email: patient.email,
            phone: patient.phone,
            address: patient.address,
        }
    }

    pub fn validate(&self) -> HospitalResult<()> {
        let mut errors = FieldErrors::new();
        errors.require_text("name", &self.name, 3, 100);
        errors.require_digits("cpf", &self.cpf, 11, 11);
        if self.birth_date >= Local::now().date_naive() {
            errors.add("birthDate", "must be in the past");
        }
        errors.require_email("email", &self.email);
        errors.require_digits("phone", &self.phone, 10, 11);
        errors.require_text("address", &self.address, 1, 200);
        errors.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDto {
    #[serde(default)]
    pub id: Option<i64>,
    pub date_time: NaiveDateTime,
    /// Ignored on create (new appointments are always SCHEDULED);
    /// required on update.
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
    pub doctor_id: i64,
    pub patient_id: i64,
    #[serde(default)]
    pub note: Option<String>,
}

impl AppointmentDto {
    pub fn from_entity(appointment: Appointment) -> Self {
        Self {
            id: Some(appointment.id),
            date_time: appointment.date_time,
            status: Some(appointment.status),
            doctor_id: appointment.doctor_id,
            patient_id: appointment.patient_id,
            note: appointment.note,
        }
    }

    pub fn validate(&self) -> HospitalResult<()> {
        let mut errors = FieldErrors::new();
        errors.optional_max("note", self.note.as_deref(), 500);
        errors.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecordDto {
    #[serde(default)]
    pub id: Option<i64>,
    pub appointment_id: i64,
    pub anamnesis: String,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub treatment_plan: Option<String>,
    /// Server-assigned.
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    /// Server-assigned on every update.
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl MedicalRecordDto {
    pub fn from_entity(record: MedicalRecord) -> Self {
        Self {
            id: Some(record.id),
            appointment_id: record.appointment_id,
            anamnesis: record.anamnesis,
            diagnosis: record.diagnosis,
            treatment_plan: record.treatment_plan,
            created_at: Some(record.created_at),
            updated_at: record.updated_at,
        }
    }

    pub fn validate(&self) -> HospitalResult<()> {
        let mut errors = FieldErrors::new();
        errors.require_text("anamnesis", &self.anamnesis, 10, 2000);
        errors.optional_max("diagnosis", self.diagnosis.as_deref(), 500);
        errors.optional_max("treatmentPlan", self.treatment_plan.as_deref(), 1000);
        errors.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionDto {
    #[serde(default)]
    pub id: Option<i64>,
    pub appointment_id: i64,
    pub medication: String,
    pub dosage: String,
    #[serde(default)]
    pub notes: Option<String>,
    /// Server-assigned at creation.
    #[serde(default)]
    pub issued_at: Option<NaiveDateTime>,
    pub valid_until: NaiveDateTime,
}

impl PrescriptionDto {
    pub fn from_entity(prescription: Prescription) -> Self {
        Self {
            id: Some(prescription.id),
            appointment_id: prescription.appointment_id,
            medication: prescription.medication,
            dosage: prescription.dosage,
            notes: prescription.notes,
            issued_at: Some(prescription.issued_at),
            valid_until: prescription.valid_until,
        }
    }

    pub fn validate(&self) -> HospitalResult<()> {
        let mut errors = FieldErrors::new();
        errors.require_text("medication", &self.medication, 3, 100);
        errors.require_text("dosage", &self.dosage, 5, 500);
        errors.optional_max("notes", self.notes.as_deref(), 500);
        if self.valid_until <= Local::now().naive_local() {
            errors.add("validUntil", "must be in the future");
        }
        errors.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExamDto {
    #[serde(default)]
    pub id: Option<i64>,
    pub appointment_id: i64,
    pub name: String,
    pub exam_type: ExamType,
    #[serde(default)]
    pub instructions: Option<String>,
    /// Server-assigned at creation.
    #[serde(default)]
    pub requested_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub result: Option<String>,
    /// Server-assigned when a result is registered.
    #[serde(default)]
    pub result_at: Option<NaiveDateTime>,
}

impl ExamDto {
    pub fn from_entity(exam: Exam) -> Self {
        Self {
            id: Some(exam.id),
            appointment_id: exam.appointment_id,
            name: exam.name,
            exam_type: exam.exam_type,
            instructions: exam.instructions,
            requested_at: Some(exam.requested_at),
            result: exam.result,
            result_at: exam.result_at,
        }
    }

    pub fn validate(&self) -> HospitalResult<()> {
        let mut errors = FieldErrors::new();
        errors.require_text("name", &self.name, 3, 100);
        errors.optional_max("instructions", self.instructions.as_deref(), 500);
        errors.optional_max("result", self.result.as_deref(), 1000);
        errors.finish()
    }
}
