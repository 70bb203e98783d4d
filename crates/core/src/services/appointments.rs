//! Appointment lifecycle service.
//!
//! State machine: SCHEDULED → COMPLETED and SCHEDULED → CANCELED, both
//! terminal. Creation requires a future date-time and a free slot for
//! the doctor: any non-canceled appointment of the same doctor starting
//! within thirty minutes of the requested time blocks it. The slot check
//! and the insert share one transaction, so two concurrent requests for
//! the same slot cannot both commit.

use chrono::{Duration, Local, NaiveDateTime};
use sqlx::SqlitePool;

use crate::dto::AppointmentDto;
use crate::error::{HospitalError, HospitalResult};
use crate::models::{Appointment, AppointmentStatus};
use crate::repositories::{
    appointments as repo, doctors, exams, medical_records, patients, prescriptions,
};

/// Length of one consultation slot.
fn slot() -> Duration {
    Duration::minutes(30)
}

#[derive(Clone)]
pub struct AppointmentService {
    pool: SqlitePool,
}

impl AppointmentService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> HospitalResult<Vec<AppointmentDto>> {
        let appointments = repo::list_all(&self.pool).await?;
        Ok(appointments.into_iter().map(AppointmentDto::from_entity).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> HospitalResult<AppointmentDto> {
        let appointment = repo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("appointment", id))?;
        Ok(AppointmentDto::from_entity(appointment))
    }

    pub async fn list_by_doctor(&self, doctor_id: i64) -> HospitalResult<Vec<AppointmentDto>> {
        let appointments = repo::list_by_doctor(&self.pool, doctor_id).await?;
        Ok(appointments.into_iter().map(AppointmentDto::from_entity).collect())
    }

    pub async fn list_by_patient(&self, patient_id: i64) -> HospitalResult<Vec<AppointmentDto>> {
        let appointments = repo::list_by_patient(&self.pool, patient_id).await?;
        Ok(appointments.into_iter().map(AppointmentDto::from_entity).collect())
    }

    pub async fn list_by_status(
        &self,
        status: AppointmentStatus,
    ) -> HospitalResult<Vec<AppointmentDto>> {
        let appointments = repo::list_by_status(&self.pool, status).await?;
        Ok(appointments.into_iter().map(AppointmentDto::from_entity).collect())
    }

    pub async fn list_by_date_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> HospitalResult<Vec<AppointmentDto>> {
        let appointments = repo::list_by_date_range(&self.pool, start, end).await?;
        Ok(appointments.into_iter().map(AppointmentDto::from_entity).collect())
    }

    /// Schedule a new appointment. Any status in the payload is ignored;
    /// new appointments are always SCHEDULED.
    pub async fn create(&self, dto: AppointmentDto) -> HospitalResult<AppointmentDto> {
        let mut tx = self.pool.begin().await?;

        doctors::find_by_id(&mut *tx, dto.doctor_id)
            .await?
            .ok_or_else(|| HospitalError::not_found("doctor", dto.doctor_id))?;
        patients::find_by_id(&mut *tx, dto.patient_id)
            .await?
            .ok_or_else(|| HospitalError::not_found("patient", dto.patient_id))?;

        Self::require_future(dto.date_time)?;
        Self::require_free_slot(&mut tx, dto.doctor_id, dto.date_time).await?;

        let id = repo::insert(
            &mut *tx,
            dto.doctor_id,
            dto.patient_id,
            dto.date_time,
            AppointmentStatus::Scheduled,
            dto.note.as_deref(),
        )
        .await?;
        tx.commit().await?;

        tracing::debug!(appointment_id = id, doctor_id = dto.doctor_id, "appointment scheduled");
        Ok(AppointmentDto::from_entity(Appointment {
            id,
            doctor_id: dto.doctor_id,
            patient_id: dto.patient_id,
            date_time: dto.date_time,
            status: AppointmentStatus::Scheduled,
            note: dto.note,
        }))
    }

    /// General update. Rejected once the appointment reached a terminal
    /// state; doctor/patient are re-resolved only when changed, and the
    /// future-date and free-slot rules re-run only when the date changed.
    pub async fn update(&self, id: i64, dto: AppointmentDto) -> HospitalResult<AppointmentDto> {
        let status = dto.status.ok_or_else(|| {
            HospitalError::Validation(vec!["status: is required".into()])
        })?;

        let mut tx = self.pool.begin().await?;

        let current = repo::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("appointment", id))?;

        match current.status {
            AppointmentStatus::Completed => {
                return Err(HospitalError::conflict(
                    "cannot modify an appointment that has already been completed",
                ));
            }
            AppointmentStatus::Canceled => {
                return Err(HospitalError::conflict(
                    "cannot modify a canceled appointment",
                ));
            }
            AppointmentStatus::Scheduled => {}
        }

        if current.doctor_id != dto.doctor_id {
            doctors::find_by_id(&mut *tx, dto.doctor_id)
                .await?
                .ok_or_else(|| HospitalError::not_found("doctor", dto.doctor_id))?;
        }
        if current.patient_id != dto.patient_id {
            patients::find_by_id(&mut *tx, dto.patient_id)
                .await?
                .ok_or_else(|| HospitalError::not_found("patient", dto.patient_id))?;
        }

        if current.date_time != dto.date_time {
            Self::require_future(dto.date_time)?;
            Self::require_free_slot(&mut tx, dto.doctor_id, dto.date_time).await?;
        }

        repo::update(
            &mut *tx,
            id,
            dto.doctor_id,
            dto.patient_id,
            dto.date_time,
            status,
            dto.note.as_deref(),
        )
        .await?;
        tx.commit().await?;

        Ok(AppointmentDto::from_entity(Appointment {
            id,
            doctor_id: dto.doctor_id,
            patient_id: dto.patient_id,
            date_time: dto.date_time,
            status,
            note: dto.note,
        }))
    }

    pub async fn cancel(&self, id: i64) -> HospitalResult<AppointmentDto> {
        let mut tx = self.pool.begin().await?;

        let mut appointment = repo::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("appointment", id))?;

        match appointment.status {
            AppointmentStatus::Completed => {
                return Err(HospitalError::conflict(
                    "cannot cancel an appointment that has already been completed",
                ));
            }
            AppointmentStatus::Canceled => {
                return Err(HospitalError::conflict("this appointment is already canceled"));
            }
            AppointmentStatus::Scheduled => {}
        }

        repo::set_status(&mut *tx, id, AppointmentStatus::Canceled).await?;
        tx.commit().await?;

        appointment.status = AppointmentStatus::Canceled;
        Ok(AppointmentDto::from_entity(appointment))
    }

    pub async fn complete(&self, id: i64) -> HospitalResult<AppointmentDto> {
        let mut tx = self.pool.begin().await?;

        let mut appointment = repo::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("appointment", id))?;

        match appointment.status {
            AppointmentStatus::Canceled => {
                return Err(HospitalError::conflict("cannot complete a canceled appointment"));
            }
            AppointmentStatus::Completed => {
                return Err(HospitalError::conflict(
                    "this appointment has already been completed",
                ));
            }
            AppointmentStatus::Scheduled => {}
        }

        repo::set_status(&mut *tx, id, AppointmentStatus::Completed).await?;
        tx.commit().await?;

        appointment.status = AppointmentStatus::Completed;
        Ok(AppointmentDto::from_entity(appointment))
    }

    /// Deletion is blocked for completed appointments and for any
    /// appointment still referenced by a medical record, prescription or
    /// exam.
    pub async fn delete(&self, id: i64) -> HospitalResult<()> {
        let mut tx = self.pool.begin().await?;

        let appointment = repo::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("appointment", id))?;

        if appointment.status == AppointmentStatus::Completed {
            return Err(HospitalError::conflict(
                "cannot delete an appointment that has already been completed",
            ));
        }
        if medical_records::count_by_appointment(&mut *tx, id).await? > 0 {
            return Err(HospitalError::conflict(
                "cannot delete the appointment because it has an associated medical record",
            ));
        }
        if prescriptions::count_by_appointment(&mut *tx, id).await? > 0 {
            return Err(HospitalError::conflict(
                "cannot delete the appointment because it has associated prescriptions",
            ));
        }
        if exams::count_by_appointment(&mut *tx, id).await? > 0 {
            return Err(HospitalError::conflict(
                "cannot delete the appointment because it has associated exams",
            ));
        }

        repo::delete(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(())
    }

    fn require_future(date_time: NaiveDateTime) -> HospitalResult<()> {
        if date_time <= Local::now().naive_local() {
            return Err(HospitalError::conflict("appointment date must be in the future"));
        }
        Ok(())
    }

    async fn require_free_slot(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        doctor_id: i64,
        start: NaiveDateTime,
    ) -> HospitalResult<()> {
        let end = start + slot();
        if repo::count_overlapping(&mut **tx, doctor_id, start, end).await? > 0 {
            return Err(HospitalError::conflict(
                "the doctor already has an appointment scheduled in this time slot",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExamType;
    use crate::services::testing;

    fn appointment_dto(doctor_id: i64, patient_id: i64, date_time: NaiveDateTime) -> AppointmentDto {
        AppointmentDto {
            id: None,
            date_time,
            status: None,
            doctor_id,
            patient_id,
            note: None,
        }
    }

    async fn seed_pair(pool: &SqlitePool) -> (i64, i64) {
        let doctor_id = testing::seed_doctor(pool, "12345").await;
        let patient_id = testing::seed_patient(pool, "12345678901").await;
        (doctor_id, patient_id)
    }

    #[tokio::test]
    async fn test_create_starts_scheduled() {
        let pool = testing::pool().await;
        let service = AppointmentService::new(pool.clone());
        let (doctor_id, patient_id) = seed_pair(&pool).await;

        let created = service
            .create(appointment_dto(doctor_id, patient_id, testing::tomorrow_at(10)))
            .await
            .expect("create should succeed");
        assert_eq!(created.status, Some(AppointmentStatus::Scheduled));
    }

    #[tokio::test]
    async fn test_create_ignores_client_supplied_status() {
        let pool = testing::pool().await;
        let service = AppointmentService::new(pool.clone());
        let (doctor_id, patient_id) = seed_pair(&pool).await;

        let mut dto = appointment_dto(doctor_id, patient_id, testing::tomorrow_at(10));
        dto.status = Some(AppointmentStatus::Completed);
        let created = service.create(dto).await.expect("create should succeed");
        assert_eq!(created.status, Some(AppointmentStatus::Scheduled));
    }

    #[tokio::test]
    async fn test_create_rejects_past_date() {
        let pool = testing::pool().await;
        let service = AppointmentService::new(pool.clone());
        let (doctor_id, patient_id) = seed_pair(&pool).await;

        let yesterday = Local::now().naive_local() - Duration::days(1);
        let err = service
            .create(appointment_dto(doctor_id, patient_id, yesterday))
            .await
            .expect_err("past date should fail");
        assert!(matches!(err, HospitalError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_doctor_and_patient() {
        let pool = testing::pool().await;
        let service = AppointmentService::new(pool.clone());
        let (doctor_id, patient_id) = seed_pair(&pool).await;

        let err = service
            .create(appointment_dto(99, patient_id, testing::tomorrow_at(10)))
            .await
            .expect_err("unknown doctor should fail");
        assert!(matches!(err, HospitalError::NotFound(_)));

        let err = service
            .create(appointment_dto(doctor_id, 99, testing::tomorrow_at(10)))
            .await
            .expect_err("unknown patient should fail");
        assert!(matches!(err, HospitalError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_overlapping_slot_is_blocked() {
        let pool = testing::pool().await;
        let service = AppointmentService::new(pool.clone());
        let (doctor_id, patient_id) = seed_pair(&pool).await;
        let other_patient = testing::seed_patient(&pool, "10987654321").await;

        let start = testing::tomorrow_at(10);
        service
            .create(appointment_dto(doctor_id, patient_id, start))
            .await
            .expect("first create should succeed");

        // Twenty minutes later falls inside the first 30-minute window.
        let err = service
            .create(appointment_dto(doctor_id, other_patient, start + Duration::minutes(20)))
            .await
            .expect_err("overlapping slot should fail");
        assert!(matches!(err, HospitalError::Conflict(_)));

        // A different doctor is free at the same time.
        let other_doctor = testing::seed_doctor(&pool, "54321").await;
        service
            .create(appointment_dto(other_doctor, other_patient, start))
            .await
            .expect("other doctor should be free");
    }

    #[tokio::test]
    async fn test_canceled_slot_does_not_block() {
        let pool = testing::pool().await;
        let service = AppointmentService::new(pool.clone());
        let (doctor_id, patient_id) = seed_pair(&pool).await;

        let start = testing::tomorrow_at(10);
        let first = service
            .create(appointment_dto(doctor_id, patient_id, start))
            .await
            .expect("create should succeed");
        service
            .cancel(first.id.unwrap())
            .await
            .expect("cancel should succeed");

        service
            .create(appointment_dto(doctor_id, patient_id, start))
            .await
            .expect("slot should be free after cancellation");
    }

    #[tokio::test]
    async fn test_terminal_transitions_are_rejected() {
        let pool = testing::pool().await;
        let service = AppointmentService::new(pool.clone());
        let (doctor_id, patient_id) = seed_pair(&pool).await;

        let completed = service
            .create(appointment_dto(doctor_id, patient_id, testing::tomorrow_at(8)))
            .await
            .expect("create should succeed");
        let completed_id = completed.id.unwrap();
        service.complete(completed_id).await.expect("complete should succeed");

        assert!(matches!(
            service.complete(completed_id).await,
            Err(HospitalError::Conflict(_))
        ));
        assert!(matches!(
            service.cancel(completed_id).await,
            Err(HospitalError::Conflict(_))
        ));

        let canceled = service
            .create(appointment_dto(doctor_id, patient_id, testing::tomorrow_at(9)))
            .await
            .expect("create should succeed");
        let canceled_id = canceled.id.unwrap();
        service.cancel(canceled_id).await.expect("cancel should succeed");

        assert!(matches!(
            service.cancel(canceled_id).await,
            Err(HospitalError::Conflict(_))
        ));
        assert!(matches!(
            service.complete(canceled_id).await,
            Err(HospitalError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_update_rejects_terminal_states() {
        let pool = testing::pool().await;
        let service = AppointmentService::new(pool.clone());
        let (doctor_id, patient_id) = seed_pair(&pool).await;

        let created = service
            .create(appointment_dto(doctor_id, patient_id, testing::tomorrow_at(10)))
            .await
            .expect("create should succeed");
        let id = created.id.unwrap();
        service.cancel(id).await.expect("cancel should succeed");

        // A canceled appointment cannot be revived through the generic
        // update path.
        let mut revive = appointment_dto(doctor_id, patient_id, testing::tomorrow_at(11));
        revive.status = Some(AppointmentStatus::Scheduled);
        let err = service.update(id, revive).await.expect_err("revive should fail");
        assert!(matches!(err, HospitalError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_can_cancel_a_scheduled_appointment() {
        let pool = testing::pool().await;
        let service = AppointmentService::new(pool.clone());
        let (doctor_id, patient_id) = seed_pair(&pool).await;

        let created = service
            .create(appointment_dto(doctor_id, patient_id, testing::tomorrow_at(10)))
            .await
            .expect("create should succeed");
        let id = created.id.unwrap();

        let mut update = appointment_dto(doctor_id, patient_id, testing::tomorrow_at(10));
        update.status = Some(AppointmentStatus::Canceled);
        let updated = service.update(id, update).await.expect("update should succeed");
        assert_eq!(updated.status, Some(AppointmentStatus::Canceled));
    }

    #[tokio::test]
    async fn test_update_revalidates_only_when_date_changes() {
        let pool = testing::pool().await;
        let service = AppointmentService::new(pool.clone());
        let (doctor_id, patient_id) = seed_pair(&pool).await;
        let other_patient = testing::seed_patient(&pool, "10987654321").await;

        let start = testing::tomorrow_at(10);
        let created = service
            .create(appointment_dto(doctor_id, patient_id, start))
            .await
            .expect("create should succeed");
        let id = created.id.unwrap();
        service
            .create(appointment_dto(doctor_id, other_patient, testing::tomorrow_at(14)))
            .await
            .expect("second create should succeed");

        // Same date: no slot re-check even though 14:00 is taken.
        let mut keep_date = appointment_dto(doctor_id, patient_id, start);
        keep_date.status = Some(AppointmentStatus::Scheduled);
        keep_date.note = Some("bring previous exams".into());
        service.update(id, keep_date).await.expect("update should succeed");

        // Moving onto the taken slot fails.
        let mut move_onto_taken = appointment_dto(doctor_id, patient_id, testing::tomorrow_at(14));
        move_onto_taken.status = Some(AppointmentStatus::Scheduled);
        let err = service
            .update(id, move_onto_taken)
            .await
            .expect_err("moving onto a taken slot should fail");
        assert!(matches!(err, HospitalError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_guards() {
        let pool = testing::pool().await;
        let service = AppointmentService::new(pool.clone());
        let (doctor_id, patient_id) = seed_pair(&pool).await;

        let created = service
            .create(appointment_dto(doctor_id, patient_id, testing::tomorrow_at(10)))
            .await
            .expect("create should succeed");
        let id = created.id.unwrap();
        service.complete(id).await.expect("complete should succeed");

        let err = service.delete(id).await.expect_err("completed should not delete");
        assert!(matches!(err, HospitalError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_blocked_by_downstream_records() {
        let pool = testing::pool().await;
        let service = AppointmentService::new(pool.clone());
        let (doctor_id, patient_id) = seed_pair(&pool).await;

        let created = service
            .create(appointment_dto(doctor_id, patient_id, testing::tomorrow_at(10)))
            .await
            .expect("create should succeed");
        let id = created.id.unwrap();
        let now = Local::now().naive_local();

        // Each downstream record type blocks deletion on its own.
        let record_id = medical_records::insert(
            &pool,
            id,
            "Patient reports chest pain for two days",
            None,
            None,
            now,
        )
        .await
        .expect("record insert should succeed");
        let err = service.delete(id).await.expect_err("record should block delete");
        assert!(matches!(err, HospitalError::Conflict(_)));
        medical_records::delete(&pool, record_id)
            .await
            .expect("record delete should succeed");

        let prescription_id = prescriptions::insert(
            &pool,
            id,
            "Aspirin",
            "one tablet every 8 hours",
            None,
            now,
            now + Duration::days(7),
        )
        .await
        .expect("prescription insert should succeed");
        let err = service
            .delete(id)
            .await
            .expect_err("prescription should block delete");
        assert!(matches!(err, HospitalError::Conflict(_)));
        prescriptions::delete(&pool, prescription_id)
            .await
            .expect("prescription delete should succeed");

        let exam_id = exams::insert(
            &pool,
            id,
            "Hemograma completo",
            ExamType::Lab,
            None,
            now,
            None,
            None,
        )
        .await
        .expect("exam insert should succeed");
        let err = service.delete(id).await.expect_err("exam should block delete");
        assert!(matches!(err, HospitalError::Conflict(_)));
        exams::delete(&pool, exam_id).await.expect("exam delete should succeed");

        service
            .delete(id)
            .await
            .expect("delete should succeed once downstream records are gone");
    }

    #[tokio::test]
    async fn test_listings_ordered_by_date() {
        let pool = testing::pool().await;
        let service = AppointmentService::new(pool.clone());
        let (doctor_id, patient_id) = seed_pair(&pool).await;

        service
            .create(appointment_dto(doctor_id, patient_id, testing::tomorrow_at(15)))
            .await
            .expect("create should succeed");
        service
            .create(appointment_dto(doctor_id, patient_id, testing::tomorrow_at(9)))
            .await
            .expect("create should succeed");

        let listed = service
            .list_by_doctor(doctor_id)
            .await
            .expect("list should succeed");
        assert_eq!(listed.len(), 2);
        assert!(listed[0].date_time < listed[1].date_time);

        let ranged = service
            .list_by_date_range(testing::tomorrow_at(8), testing::tomorrow_at(10))
            .await
            .expect("range should succeed");
        assert_eq!(ranged.len(), 1);
    }
}
