//! Doctor service.
//!
//! CRM uniqueness is pre-checked here; email uniqueness is left to the
//! storage unique constraint. Every specialty id in the payload must
//! resolve, and the join table is rewritten as a whole on update.

use sqlx::SqlitePool;

use crate::dto::DoctorDto;
use crate::error::{HospitalError, HospitalResult};
use crate::models::Doctor;
use crate::repositories::{doctors as repo, specialties};

#[derive(Clone)]
pub struct DoctorService {
    pool: SqlitePool,
}

impl DoctorService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> HospitalResult<Vec<DoctorDto>> {
        let doctors = repo::list_all(&self.pool).await?;
        self.to_dtos(doctors).await
    }

    pub async fn find_by_id(&self, id: i64) -> HospitalResult<DoctorDto> {
        let doctor = repo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("doctor", id))?;
        self.to_dto(doctor).await
    }

    pub async fn search_by_name(&self, name: &str) -> HospitalResult<Vec<DoctorDto>> {
        let doctors = repo::search_by_name(&self.pool, name).await?;
        self.to_dtos(doctors).await
    }

    pub async fn list_by_specialty(&self, specialty_id: i64) -> HospitalResult<Vec<DoctorDto>> {
        let doctors = repo::list_by_specialty(&self.pool, specialty_id).await?;
        self.to_dtos(doctors).await
    }

    pub async fn create(&self, dto: DoctorDto) -> HospitalResult<DoctorDto> {
        let mut tx = self.pool.begin().await?;

        if repo::find_by_crm(&mut *tx, &dto.crm).await?.is_some() {
            return Err(HospitalError::conflict(format!(
                "a doctor with CRM {} is already registered",
                dto.crm
            )));
        }

        for specialty_id in &dto.specialty_ids {
            specialties::find_by_id(&mut *tx, *specialty_id)
                .await?
                .ok_or_else(|| HospitalError::not_found("specialty", *specialty_id))?;
        }

        let id = repo::insert(&mut *tx, &dto.name, &dto.crm, &dto.email, &dto.phone).await?;
        for specialty_id in &dto.specialty_ids {
            repo::add_specialty(&mut *tx, id, *specialty_id).await?;
        }
        tx.commit().await?;

        tracing::debug!(doctor_id = id, "doctor registered");
        self.find_by_id(id).await
    }

    pub async fn update(&self, id: i64, dto: DoctorDto) -> HospitalResult<DoctorDto> {
        let mut tx = self.pool.begin().await?;

        let current = repo::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("doctor", id))?;

        if current.crm != dto.crm && repo::find_by_crm(&mut *tx, &dto.crm).await?.is_some() {
            return Err(HospitalError::conflict(format!(
                "a doctor with CRM {} is already registered",
                dto.crm
            )));
        }

        for specialty_id in &dto.specialty_ids {
            specialties::find_by_id(&mut *tx, *specialty_id)
                .await?
                .ok_or_else(|| HospitalError::not_found("specialty", *specialty_id))?;
        }

        repo::update(&mut *tx, id, &dto.name, &dto.crm, &dto.email, &dto.phone).await?;
        repo::clear_specialties(&mut *tx, id).await?;
        for specialty_id in &dto.specialty_ids {
            repo::add_specialty(&mut *tx, id, *specialty_id).await?;
        }
        tx.commit().await?;

        self.find_by_id(id).await
    }

    /// Deletion is blocked while the doctor has any appointment.
    pub async fn delete(&self, id: i64) -> HospitalResult<()> {
        let mut tx = self.pool.begin().await?;

        repo::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("doctor", id))?;

        if repo::count_appointments(&mut *tx, id).await? > 0 {
            return Err(HospitalError::conflict(
                "cannot delete the doctor because they have associated appointments",
            ));
        }

        repo::clear_specialties(&mut *tx, id).await?;
        repo::delete(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn to_dto(&self, doctor: Doctor) -> HospitalResult<DoctorDto> {
        let specialty_ids = repo::specialty_ids(&self.pool, doctor.id).await?;
        Ok(DoctorDto::from_entity(doctor, specialty_ids))
    }

    async fn to_dtos(&self, doctors: Vec<Doctor>) -> HospitalResult<Vec<DoctorDto>> {
        let mut dtos = Vec::with_capacity(doctors.len());
        for doctor in doctors {
            dtos.push(self.to_dto(doctor).await?);
        }
        Ok(dtos)
    }
}
