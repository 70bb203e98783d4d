//! Exam service.
//!
//! Exams are requested against completed appointments. `requested_at`
//! is stamped at creation. A result can arrive with the creation
//! payload, through the general update (which stamps `result_at` the
//! first time a result appears) or through the dedicated
//! `register_result`, which always restamps.

use chrono::Local;
use sqlx::SqlitePool;

use crate::dto::ExamDto;
use crate::error::{HospitalError, HospitalResult};
use crate::models::{AppointmentStatus, ExamType};
use crate::repositories::{appointments, exams as repo};

#[derive(Clone)]
pub struct ExamService {
    pool: SqlitePool,
}

impl ExamService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> HospitalResult<Vec<ExamDto>> {
        let exams = repo::list_all(&self.pool).await?;
        Ok(exams.into_iter().map(ExamDto::from_entity).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> HospitalResult<ExamDto> {
        let exam = repo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("exam", id))?;
        Ok(ExamDto::from_entity(exam))
    }

    pub async fn list_by_appointment(&self, appointment_id: i64) -> HospitalResult<Vec<ExamDto>> {
        let exams = repo::list_by_appointment(&self.pool, appointment_id).await?;
        Ok(exams.into_iter().map(ExamDto::from_entity).collect())
    }

    pub async fn list_by_patient(&self, patient_id: i64) -> HospitalResult<Vec<ExamDto>> {
        let exams = repo::list_by_patient(&self.pool, patient_id).await?;
        Ok(exams.into_iter().map(ExamDto::from_entity).collect())
    }

    pub async fn list_by_type(&self, exam_type: ExamType) -> HospitalResult<Vec<ExamDto>> {
        let exams = repo::list_by_type(&self.pool, exam_type).await?;
        Ok(exams.into_iter().map(ExamDto::from_entity).collect())
    }

    pub async fn list_pending(&self) -> HospitalResult<Vec<ExamDto>> {
        let exams = repo::list_pending(&self.pool).await?;
        Ok(exams.into_iter().map(ExamDto::from_entity).collect())
    }

    /// A non-blank result in the creation payload is persisted and
    /// stamps `result_at`; otherwise the exam starts pending.
    pub async fn create(&self, dto: ExamDto) -> HospitalResult<ExamDto> {
        let mut tx = self.pool.begin().await?;

        let appointment = appointments::find_by_id(&mut *tx, dto.appointment_id)
            .await?
            .ok_or_else(|| HospitalError::not_found("appointment", dto.appointment_id))?;
        if appointment.status != AppointmentStatus::Completed {
            return Err(HospitalError::conflict(
                "an exam can only be requested for a completed appointment",
            ));
        }

        let requested_at = Local::now().naive_local();
        let result = dto
            .result
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_owned);
        let result_at = result.as_ref().map(|_| requested_at);
        let id = repo::insert(
            &mut *tx,
            dto.appointment_id,
            &dto.name,
            dto.exam_type,
            dto.instructions.as_deref(),
            requested_at,
            result.as_deref(),
            result_at,
        )
        .await?;
        tx.commit().await?;

        Ok(ExamDto {
            id: Some(id),
            requested_at: Some(requested_at),
            result,
            result_at,
            ..dto
        })
    }

    /// A payload pointing at a different appointment is rejected. When
    /// the update carries the first result for the exam, `result_at` is
    /// stamped; an already stamped timestamp is kept.
    pub async fn update(&self, id: i64, dto: ExamDto) -> HospitalResult<ExamDto> {
        let mut tx = self.pool.begin().await?;

        let current = repo::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("exam", id))?;

        if dto.appointment_id != current.appointment_id {
            return Err(HospitalError::conflict(
                "cannot change the appointment associated with the exam",
            ));
        }

        let result_at = match (&dto.result, current.result_at) {
            (Some(_), None) => Some(Local::now().naive_local()),
            (Some(_), stamped @ Some(_)) => stamped,
            (None, _) => None,
        };

        repo::update(
            &mut *tx,
            id,
            &dto.name,
            dto.exam_type,
            dto.instructions.as_deref(),
            dto.result.as_deref(),
            result_at,
        )
        .await?;
        tx.commit().await?;

        Ok(ExamDto {
            id: Some(id),
            appointment_id: current.appointment_id,
            requested_at: Some(current.requested_at),
            result_at,
            ..dto
        })
    }

    /// Record the outcome of the exam. Overwrites any previous result
    /// and restamps `result_at`.
    pub async fn register_result(&self, id: i64, result: &str) -> HospitalResult<ExamDto> {
        let trimmed = result.trim();
        if trimmed.is_empty() {
            return Err(HospitalError::conflict("the exam result cannot be blank"));
        }

        let mut tx = self.pool.begin().await?;

        let mut exam = repo::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("exam", id))?;

        let result_at = Local::now().naive_local();
        repo::set_result(&mut *tx, id, trimmed, result_at).await?;
        tx.commit().await?;

        exam.result = Some(trimmed.to_owned());
        exam.result_at = Some(result_at);
        Ok(ExamDto::from_entity(exam))
    }

    pub async fn delete(&self, id: i64) -> HospitalResult<()> {
        let mut tx = self.pool.begin().await?;

        repo::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("exam", id))?;

        repo::delete(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing;

    fn exam_dto(appointment_id: i64) -> ExamDto {
        ExamDto {
            id: None,
            appointment_id,
            name: "Hemograma completo".into(),
            exam_type: ExamType::Lab,
            instructions: Some("fasting for 8 hours".into()),
            requested_at: None,
            result: None,
            result_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_requires_completed_appointment() {
        let pool = testing::pool().await;
        let service = ExamService::new(pool.clone());
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
            .create(exam_dto(scheduled))
            .await
            .expect_err("scheduled appointment should not take an exam");
        assert!(matches!(err, HospitalError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_keeps_supplied_result() {
        let pool = testing::pool().await;
        let service = ExamService::new(pool.clone());
        let appointment_id = testing::seed_completed_appointment(&pool).await;

        let mut dto = exam_dto(appointment_id);
        dto.result = Some("normal".into());
        let created = service.create(dto).await.expect("create should succeed");

        assert_eq!(created.result.as_deref(), Some("normal"));
        assert!(created.result_at.is_some());
        assert!(created.requested_at.is_some());
    }

    #[tokio::test]
    async fn test_create_without_result_starts_pending() {
        let pool = testing::pool().await;
        let service = ExamService::new(pool.clone());
        let appointment_id = testing::seed_completed_appointment(&pool).await;

        let mut blank = exam_dto(appointment_id);
        blank.result = Some("   ".into());
        let created = service.create(blank).await.expect("create should succeed");

        assert!(created.result.is_none());
        assert!(created.result_at.is_none());
    }

    #[tokio::test]
    async fn test_update_rejects_changing_the_appointment() {
        let pool = testing::pool().await;
        let service = ExamService::new(pool.clone());
        let appointment_id = testing::seed_completed_appointment(&pool).await;

        let created = service
            .create(exam_dto(appointment_id))
            .await
            .expect("create should succeed");

        let err = service
            .update(created.id.unwrap(), exam_dto(appointment_id + 1))
            .await
            .expect_err("re-pointing the exam should fail");
        assert!(matches!(err, HospitalError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_register_result_stamps_and_overwrites() {
        let pool = testing::pool().await;
        let service = ExamService::new(pool.clone());
        let appointment_id = testing::seed_completed_appointment(&pool).await;

        let created = service
            .create(exam_dto(appointment_id))
            .await
            .expect("create should succeed");
        let id = created.id.unwrap();

        let first = service
            .register_result(id, "  normal  ")
            .await
            .expect("register should succeed");
        assert_eq!(first.result.as_deref(), Some("normal"));
        assert!(first.result_at.is_some());

        let second = service
            .register_result(id, "altered")
            .await
            .expect("second register should succeed");
        assert_eq!(second.result.as_deref(), Some("altered"));
    }

    #[tokio::test]
    async fn test_register_blank_result_is_rejected() {
        let pool = testing::pool().await;
        let service = ExamService::new(pool.clone());
        let appointment_id = testing::seed_completed_appointment(&pool).await;

        let created = service
            .create(exam_dto(appointment_id))
            .await
            .expect("create should succeed");

        let err = service
            .register_result(created.id.unwrap(), "   ")
            .await
            .expect_err("blank result should fail");
        assert!(matches!(err, HospitalError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_stamps_result_at_once() {
        let pool = testing::pool().await;
        let service = ExamService::new(pool.clone());
        let appointment_id = testing::seed_completed_appointment(&pool).await;

        let created = service
            .create(exam_dto(appointment_id))
            .await
            .expect("create should succeed");
        let id = created.id.unwrap();

        let mut with_result = exam_dto(appointment_id);
        with_result.result = Some("normal".into());
        let updated = service.update(id, with_result).await.expect("update should succeed");
        let stamped = updated.result_at.expect("result_at should be stamped");

        let mut edit = exam_dto(appointment_id);
        edit.result = Some("normal, reviewed".into());
        let edited = service.update(id, edit).await.expect("update should succeed");
        assert_eq!(edited.result_at, Some(stamped));
    }

    #[tokio::test]
    async fn test_pending_listing_drops_resulted_exams() {
        let pool = testing::pool().await;
        let service = ExamService::new(pool.clone());
        let appointment_id = testing::seed_completed_appointment(&pool).await;

        let first = service
            .create(exam_dto(appointment_id))
            .await
            .expect("create should succeed");
        let mut second = exam_dto(appointment_id);
        second.name = "Raio-X de torax".into();
        second.exam_type = ExamType::Imaging;
        service.create(second).await.expect("create should succeed");

        service
            .register_result(first.id.unwrap(), "normal")
            .await
            .expect("register should succeed");

        let pending = service.list_pending().await.expect("list should succeed");
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].exam_type, ExamType::Imaging);

        let imaging = service
            .list_by_type(ExamType::Imaging)
            .await
            .expect("list should succeed");
        assert_eq!(imaging.len(), 1);
    }
}
