//! Patient service.
//!
//! The CPF (national id) is pre-checked for uniqueness on create and on
//! any update that changes it. The original implementation raised a
//! not-found-styled error for a duplicate CPF on create; that is
//! corrected to a conflict here.

use sqlx::SqlitePool;

use crate::dto::PatientDto;
use crate::error::{HospitalError, HospitalResult};
use crate::repositories::patients as repo;

#[derive(Clone)]
pub struct PatientService {
    pool: SqlitePool,
}

impl PatientService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> HospitalResult<Vec<PatientDto>> {
        let patients = repo::list_all(&self.pool).await?;
        Ok(patients.into_iter().map(PatientDto::from_entity).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> HospitalResult<PatientDto> {
        let patient = repo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("patient", id))?;
        Ok(PatientDto::from_entity(patient))
    }

    pub async fn find_by_cpf(&self, cpf: &str) -> HospitalResult<PatientDto> {
        let patient = repo::find_by_cpf(&self.pool, cpf)
            .await?
            .ok_or_else(|| HospitalError::not_found_by("patient", "CPF", cpf))?;
        Ok(PatientDto::from_entity(patient))
    }

    pub async fn search_by_name(&self, name: &str) -> HospitalResult<Vec<PatientDto>> {
        let patients = repo::search_by_name(&self.pool, name).await?;
        Ok(patients.into_iter().map(PatientDto::from_entity).collect())
    }

    pub async fn create(&self, dto: PatientDto) -> HospitalResult<PatientDto> {
        let mut tx = self.pool.begin().await?;

        if repo::find_by_cpf(&mut *tx, &dto.cpf).await?.is_some() {
            return Err(HospitalError::conflict(format!(
                "a patient with CPF {} is already registered",
                dto.cpf
            )));
        }

        let id = repo::insert(
            &mut *tx,
            &dto.name,
            &dto.cpf,
            dto.birth_date,
            &dto.email,
            &dto.phone,
            &dto.address,
        )
        .await?;
        tx.commit().await?;

        Ok(PatientDto {
            id: Some(id),
            ..dto
        })
    }

    pub async fn update(&self, id: i64, dto: PatientDto) -> HospitalResult<PatientDto> {
        let mut tx = self.pool.begin().await?;

        let current = repo::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("patient", id))?;

        if current.cpf != dto.cpf && repo::find_by_cpf(&mut *tx, &dto.cpf).await?.is_some() {
            return Err(HospitalError::conflict(format!(
                "a patient with CPF {} is already registered",
                dto.cpf
            )));
        }

        repo::update(
            &mut *tx,
            id,
            &dto.name,
            &dto.cpf,
            dto.birth_date,
            &dto.email,
            &dto.phone,
            &dto.address,
        )
        .await?;
        tx.commit().await?;

        Ok(PatientDto {
            id: Some(id),
            ..dto
        })
    }

    /// Deletion is blocked while the patient has any appointment.
    pub async fn delete(&self, id: i64) -> HospitalResult<()> {
        let mut tx = self.pool.begin().await?;

        repo::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("patient", id))?;

        if repo::count_appointments(&mut *tx, id).await? > 0 {
            return Err(HospitalError::conflict(
                "cannot delete the patient because they have associated appointments",
            ));
        }

        repo::delete(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(())
    }
}
