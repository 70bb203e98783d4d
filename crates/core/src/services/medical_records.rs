//! Medical record service.
//!
//! A record can only be attached to a completed appointment, and each
//! appointment holds at most one record. `created_at` is assigned here
//! at creation and `updated_at` on every update.

use chrono::Local;
use sqlx::SqlitePool;

use crate::dto::MedicalRecordDto;
use crate::error::{HospitalError, HospitalResult};
use crate::models::AppointmentStatus;
use crate::repositories::{appointments, medical_records as repo};

#[derive(Clone)]
pub struct MedicalRecordService {
    pool: SqlitePool,
}

impl MedicalRecordService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> HospitalResult<Vec<MedicalRecordDto>> {
        let records = repo::list_all(&self.pool).await?;
        Ok(records.into_iter().map(MedicalRecordDto::from_entity).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> HospitalResult<MedicalRecordDto> {
        let record = repo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("medical record", id))?;
        Ok(MedicalRecordDto::from_entity(record))
    }

    pub async fn find_by_appointment(
        &self,
        appointment_id: i64,
    ) -> HospitalResult<MedicalRecordDto> {
        let record = repo::find_by_appointment(&self.pool, appointment_id)
            .await?
            .ok_or_else(|| {
                HospitalError::not_found_by("medical record", "appointment", appointment_id)
            })?;
        Ok(MedicalRecordDto::from_entity(record))
    }

    pub async fn list_by_patient(&self, patient_id: i64) -> HospitalResult<Vec<MedicalRecordDto>> {
        let records = repo::list_by_patient(&self.pool, patient_id).await?;
        Ok(records.into_iter().map(MedicalRecordDto::from_entity).collect())
    }

    pub async fn create(&self, dto: MedicalRecordDto) -> HospitalResult<MedicalRecordDto> {
        let mut tx = self.pool.begin().await?;

        let appointment = appointments::find_by_id(&mut *tx, dto.appointment_id)
            .await?
            .ok_or_else(|| HospitalError::not_found("appointment", dto.appointment_id))?;
        if appointment.status != AppointmentStatus::Completed {
            return Err(HospitalError::conflict(
                "a medical record can only be created for a completed appointment",
            ));
        }
        if repo::find_by_appointment(&mut *tx, dto.appointment_id).await?.is_some() {
            return Err(HospitalError::conflict(
                "this appointment already has a medical record",
            ));
        }

        let created_at = Local::now().naive_local();
        let id = repo::insert(
            &mut *tx,
            dto.appointment_id,
            &dto.anamnesis,
            dto.diagnosis.as_deref(),
            dto.treatment_plan.as_deref(),
            created_at,
        )
        .await?;
        tx.commit().await?;

        Ok(MedicalRecordDto {
            id: Some(id),
            created_at: Some(created_at),
            updated_at: None,
            ..dto
        })
    }

    /// The owning appointment cannot be changed; a payload pointing at a
    /// different appointment is rejected.
    pub async fn update(&self, id: i64, dto: MedicalRecordDto) -> HospitalResult<MedicalRecordDto> {
        let mut tx = self.pool.begin().await?;

        let current = repo::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("medical record", id))?;

        if dto.appointment_id != current.appointment_id {
            return Err(HospitalError::conflict(
                "cannot change the appointment associated with the medical record",
            ));
        }

        let updated_at = Local::now().naive_local();
        repo::update(
            &mut *tx,
            id,
            &dto.anamnesis,
            dto.diagnosis.as_deref(),
            dto.treatment_plan.as_deref(),
            updated_at,
        )
        .await?;
        tx.commit().await?;

        Ok(MedicalRecordDto {
            id: Some(id),
            appointment_id: current.appointment_id,
            created_at: Some(current.created_at),
            updated_at: Some(updated_at),
            ..dto
        })
    }

    pub async fn delete(&self, id: i64) -> HospitalResult<()> {
        let mut tx = self.pool.begin().await?;

        repo::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("medical record", id))?;

        repo::delete(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(())
    }
}
