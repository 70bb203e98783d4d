//! Prescription service.
//!
//! Prescriptions hang off completed appointments. `issued_at` is
//! stamped here at creation and never changes afterwards; `valid_until`
//! comes from the caller and must lie in the future (checked by the
//! payload validation at the HTTP layer).

use chrono::Local;
use sqlx::SqlitePool;

use crate::dto::PrescriptionDto;
use crate::error::{HospitalError, HospitalResult};
use crate::models::AppointmentStatus;
use crate::repositories::{appointments, prescriptions as repo};

#[derive(Clone)]
pub struct PrescriptionService {
    pool: SqlitePool,
}

impl PrescriptionService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> HospitalResult<Vec<PrescriptionDto>> {
        let prescriptions = repo::list_all(&self.pool).await?;
        Ok(prescriptions.into_iter().map(PrescriptionDto::from_entity).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> HospitalResult<PrescriptionDto> {
        let prescription = repo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("prescription", id))?;
        Ok(PrescriptionDto::from_entity(prescription))
    }

    pub async fn list_by_appointment(
        &self,
        appointment_id: i64,
    ) -> HospitalResult<Vec<PrescriptionDto>> {
        let prescriptions = repo::list_by_appointment(&self.pool, appointment_id).await?;
        Ok(prescriptions.into_iter().map(PrescriptionDto::from_entity).collect())
    }

    pub async fn list_by_patient(&self, patient_id: i64) -> HospitalResult<Vec<PrescriptionDto>> {
        let prescriptions = repo::list_by_patient(&self.pool, patient_id).await?;
        Ok(prescriptions.into_iter().map(PrescriptionDto::from_entity).collect())
    }

    pub async fn search_by_medication(
        &self,
        medication: &str,
    ) -> HospitalResult<Vec<PrescriptionDto>> {
        let prescriptions = repo::search_by_medication(&self.pool, medication).await?;
        Ok(prescriptions.into_iter().map(PrescriptionDto::from_entity).collect())
    }

    pub async fn create(&self, dto: PrescriptionDto) -> HospitalResult<PrescriptionDto> {
        let mut tx = self.pool.begin().await?;

        let appointment = appointments::find_by_id(&mut *tx, dto.appointment_id)
            .await?
            .ok_or_else(|| HospitalError::not_found("appointment", dto.appointment_id))?;
        if appointment.status != AppointmentStatus::Completed {
            return Err(HospitalError::conflict(
                "a prescription can only be issued for a completed appointment",
            ));
        }

        let issued_at = Local::now().naive_local();
        let id = repo::insert(
            &mut *tx,
            dto.appointment_id,
            &dto.medication,
            &dto.dosage,
            dto.notes.as_deref(),
            issued_at,
            dto.valid_until,
        )
        .await?;
        tx.commit().await?;

        Ok(PrescriptionDto {
            id: Some(id),
            issued_at: Some(issued_at),
            ..dto
        })
    }

    /// `issued_at` never changes, and a payload pointing at a different
    /// appointment is rejected.
    pub async fn update(&self, id: i64, dto: PrescriptionDto) -> HospitalResult<PrescriptionDto> {
        let mut tx = self.pool.begin().await?;

        let current = repo::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("prescription", id))?;

        if dto.appointment_id != current.appointment_id {
            return Err(HospitalError::conflict(
                "cannot change the appointment associated with the prescription",
            ));
        }

        repo::update(
            &mut *tx,
            id,
            &dto.medication,
            &dto.dosage,
            dto.notes.as_deref(),
            dto.valid_until,
        )
        .await?;
        tx.commit().await?;

        Ok(PrescriptionDto {
            id: Some(id),
            appointment_id: current.appointment_id,
            issued_at: Some(current.issued_at),
            ..dto
        })
    }

    pub async fn delete(&self, id: i64) -> HospitalResult<()> {
        let mut tx = self.pool.begin().await?;

        repo::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("prescription", id))?;

        repo::delete(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing;
    use chrono::Duration;

    fn prescription_dto(appointment_id: i64) -> PrescriptionDto {
        PrescriptionDto {
            id: None,
            appointment_id,
            medication: "Aspirin".into(),
            dosage: "one 100mg tablet every 8 hours".into(),
            notes: None,
            issued_at: None,
            valid_until: Local::now().naive_local() + Duration::days(30),
        }
    }

    #[tokio::test]
    async fn test_create_requires_completed_appointment() {
        let pool = testing::pool().await;
        let service = PrescriptionService::new(pool.clone());
        let doctor_id = testing::seed_doctor(&pool, "12345").await;
        let patient_id = testing::seed_patient(&pool, "12345678901").await;
        let scheduled = testing::seed_appointment(
            &pool,
            doctor_id,
            patient_id,
            testing::tomorrow_at(10),
            AppointmentStatus::Scheduled,
        )
        .await;

        let err = service
            .create(prescription_dto(scheduled))
            .await
            .expect_err("scheduled appointment should not take a prescription");
        assert!(matches!(err, HospitalError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_stamps_issued_at() {
        let pool = testing::pool().await;
        let service = PrescriptionService::new(pool.clone());
        let appointment_id = testing::seed_completed_appointment(&pool).await;

        let created = service
            .create(prescription_dto(appointment_id))
            .await
            .expect("create should succeed");
        assert!(created.issued_at.is_some());
    }

    #[tokio::test]
    async fn test_update_preserves_issue_timestamp() {
        let pool = testing::pool().await;
        let service = PrescriptionService::new(pool.clone());
        let appointment_id = testing::seed_completed_appointment(&pool).await;

        let created = service
            .create(prescription_dto(appointment_id))
            .await
            .expect("create should succeed");
        let id = created.id.unwrap();

        let mut change = prescription_dto(appointment_id);
        change.dosage = "one 100mg tablet every 12 hours".into();
        let updated = service.update(id, change).await.expect("update should succeed");

        assert_eq!(updated.appointment_id, appointment_id);
        assert_eq!(updated.issued_at, created.issued_at);
        assert_eq!(updated.dosage, "one 100mg tablet every 12 hours");
    }

    #[tokio::test]
    async fn test_update_rejects_changing_the_appointment() {
        let pool = testing::pool().await;
        let service = PrescriptionService::new(pool.clone());
        let appointment_id = testing::seed_completed_appointment(&pool).await;

        let created = service
            .create(prescription_dto(appointment_id))
            .await
            .expect("create should succeed");

        let err = service
            .update(created.id.unwrap(), prescription_dto(appointment_id + 1))
            .await
            .expect_err("re-pointing the prescription should fail");
        assert!(matches!(err, HospitalError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_search_by_medication_substring() {
        let pool = testing::pool().await;
        let service = PrescriptionService::new(pool.clone());
        let appointment_id = testing::seed_completed_appointment(&pool).await;

        service
            .create(prescription_dto(appointment_id))
            .await
            .expect("create should succeed");

        let hits = service
            .search_by_medication("spir")
            .await
            .expect("search should succeed");
        assert_eq!(hits.len(), 1);

        let misses = service
            .search_by_medication("Ibuprofen")
            .await
            .expect("search should succeed");
        assert!(misses.is_empty());
    }

    #[tokio::test]
    async fn test_list_by_patient_follows_the_appointment() {
        let pool = testing::pool().await;
        let service = PrescriptionService::new(pool.clone());
        let appointment_id = testing::seed_completed_appointment(&pool).await;

        service
            .create(prescription_dto(appointment_id))
            .await
            .expect("create should succeed");

        let appointment = crate::repositories::appointments::find_by_id(&pool, appointment_id)
            .await
            .expect("lookup should succeed")
            .expect("appointment should exist");
        let listed = service
            .list_by_patient(appointment.patient_id)
            .await
            .expect("list should succeed");
        assert_eq!(listed.len(), 1);
    }
}
