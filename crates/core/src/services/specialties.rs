//! Specialty service.

use sqlx::SqlitePool;

use crate::dto::SpecialtyDto;
use crate::error::{HospitalError, HospitalResult};
use crate::models::Specialty;
use crate::repositories::specialties as repo;

#[derive(Clone)]
pub struct SpecialtyService {
    pool: SqlitePool,
}

impl SpecialtyService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> HospitalResult<Vec<SpecialtyDto>> {
        let specialties = repo::list_all(&self.pool).await?;
        Ok(specialties.into_iter().map(SpecialtyDto::from_entity).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> HospitalResult<SpecialtyDto> {
        let specialty = repo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("specialty", id))?;
        Ok(SpecialtyDto::from_entity(specialty))
    }

    pub async fn find_by_name(&self, name: &str) -> HospitalResult<SpecialtyDto> {
        let specialty = repo::find_by_name(&self.pool, name)
            .await?
            .ok_or_else(|| HospitalError::not_found_by("specialty", "name", name))?;
        Ok(SpecialtyDto::from_entity(specialty))
    }

    pub async fn list_by_doctor(&self, doctor_id: i64) -> HospitalResult<Vec<SpecialtyDto>> {
        let specialties = repo::list_by_doctor(&self.pool, doctor_id).await?;
        Ok(specialties.into_iter().map(SpecialtyDto::from_entity).collect())
    }

    /// Fails with a conflict when the name is already registered.
    pub async fn create(&self, dto: SpecialtyDto) -> HospitalResult<SpecialtyDto> {
        let mut tx = self.pool.begin().await?;

        if repo::find_by_name(&mut *tx, &dto.name).await?.is_some() {
            return Err(HospitalError::conflict(format!(
                "a specialty named '{}' is already registered",
                dto.name
            )));
        }

        let id = repo::insert(&mut *tx, &dto.name, &dto.description).await?;
        tx.commit().await?;

        Ok(SpecialtyDto::from_entity(Specialty {
            id,
            name: dto.name,
            description: dto.description,
        }))
    }

    /// Renaming onto a name held by another specialty is a conflict.
    pub async fn update(&self, id: i64, dto: SpecialtyDto) -> HospitalResult<SpecialtyDto> {
        let mut tx = self.pool.begin().await?;

        let current = repo::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("specialty", id))?;

        if current.name != dto.name && repo::find_by_name(&mut *tx, &dto.name).await?.is_some() {
            return Err(HospitalError::conflict(format!(
                "a specialty named '{}' is already registered",
                dto.name
            )));
        }

        repo::update(&mut *tx, id, &dto.name, &dto.description).await?;
        tx.commit().await?;

        Ok(SpecialtyDto::from_entity(Specialty {
            id,
            name: dto.name,
            description: dto.description,
        }))
    }

    /// Deletion is blocked while any doctor still holds the specialty.
    pub async fn delete(&self, id: i64) -> HospitalResult<()> {
        let mut tx = self.pool.begin().await?;

        repo::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| HospitalError::not_found("specialty", id))?;

        if repo::count_doctors(&mut *tx, id).await? > 0 {
            return Err(HospitalError::conflict(
                "cannot delete the specialty because it is associated with doctors",
            ));
        }

        repo::delete(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::doctors;
    use crate::services::testing;

    fn cardiology() -> SpecialtyDto {
        SpecialtyDto {
            id: None,
            name: "Cardiology".into(),
            description: "Heart and circulatory system".into(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_id() {
        let pool = testing::pool().await;
        let service = SpecialtyService::new(pool);

        let created = service.create(cardiology()).await.expect("create should succeed");
        let id = created.id.expect("id should be assigned");

        let found = service.find_by_id(id).await.expect("find should succeed");
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_create_duplicate_name_conflicts() {
        let pool = testing::pool().await;
        let service = SpecialtyService::new(pool);

        service.create(cardiology()).await.expect("first create should succeed");
        let err = service
            .create(cardiology())
            .await
            .expect_err("duplicate name should fail");
        assert!(matches!(err, HospitalError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_rejects_name_held_by_another() {
        let pool = testing::pool().await;
        let service = SpecialtyService::new(pool);

        service.create(cardiology()).await.expect("create should succeed");
        let other = service
            .create(SpecialtyDto {
                id: None,
                name: "Dermatology".into(),
                description: "Skin".into(),
            })
            .await
            .expect("create should succeed");

        let err = service
            .update(other.id.unwrap(), cardiology())
            .await
            .expect_err("rename onto taken name should fail");
        assert!(matches!(err, HospitalError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_blocked_while_doctor_holds_specialty() {
        let pool = testing::pool().await;
        let service = SpecialtyService::new(pool.clone());

        let created = service.create(cardiology()).await.expect("create should succeed");
        let specialty_id = created.id.unwrap();
        let doctor_id = testing::seed_doctor(&pool, "12345").await;
        doctors::add_specialty(&pool, doctor_id, specialty_id)
            .await
            .expect("link should succeed");

        let err = service
            .delete(specialty_id)
            .await
            .expect_err("delete should be blocked");
        assert!(matches!(err, HospitalError::Conflict(_)));

        doctors::clear_specialties(&pool, doctor_id)
            .await
            .expect("unlink should succeed");
        service
            .delete(specialty_id)
            .await
            .expect("delete should succeed once unlinked");
    }

    #[tokio::test]
    async fn test_find_by_name_not_found() {
        let pool = testing::pool().await;
        let service = SpecialtyService::new(pool);

        let err = service
            .find_by_name("Nonexistent")
            .await
            .expect_err("missing name should fail");
        assert!(matches!(err, HospitalError::NotFound(_)));
    }
}
