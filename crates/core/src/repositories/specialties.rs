//! Specialty queries.

use sqlx::SqliteExecutor;

use crate::error::HospitalResult;
use crate::models::Specialty;

pub async fn list_all<'e, E: SqliteExecutor<'e>>(ex: E) -> HospitalResult<Vec<Specialty>> {
    let rows = sqlx::query_as::<_, Specialty>(
        "SELECT id, name, description FROM specialties ORDER BY id",
    )
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(
    ex: E,
    id: i64,
) -> HospitalResult<Option<Specialty>> {
    let row = sqlx::query_as::<_, Specialty>(
        "SELECT id, name, description FROM specialties WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn find_by_name<'e, E: SqliteExecutor<'e>>(
    ex: E,
    name: &str,
) -> HospitalResult<Option<Specialty>> {
    let row = sqlx::query_as::<_, Specialty>(
        "SELECT id, name, description FROM specialties WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn list_by_doctor<'e, E: SqliteExecutor<'e>>(
    ex: E,
    doctor_id: i64,
) -> HospitalResult<Vec<Specialty>> {
    let rows = sqlx::query_as::<_, Specialty>(
        "SELECT s.id, s.name, s.description
         FROM specialties s
         JOIN doctor_specialties ds ON ds.specialty_id = s.id
         WHERE ds.doctor_id = ?
         ORDER BY s.name",
    )
    .bind(doctor_id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn insert<'e, E: SqliteExecutor<'e>>(
    ex: E,
    name: &str,
    description: &str,
) -> HospitalResult<i64> {
    let result = sqlx::query("INSERT INTO specialties (name, description) VALUES (?, ?)")
        .bind(name)
        .bind(description)
        .execute(ex)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn update<'e, E: SqliteExecutor<'e>>(
    ex: E,
    id: i64,
    name: &str,
    description: &str,
) -> HospitalResult<()> {
    sqlx::query("UPDATE specialties SET name = ?, description = ? WHERE id = ?")
        .bind(name)
        .bind(description)
        .bind(id)
        .execute(ex)
        .await?;
    Ok(())
}

pub async fn delete<'e, E: SqliteExecutor<'e>>(ex: E, id: i64) -> HospitalResult<()> {
    sqlx::query("DELETE FROM specialties WHERE id = ?")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(())
}

/// Number of doctors still holding this specialty; gates deletion.
pub async fn count_doctors<'e, E: SqliteExecutor<'e>>(
    ex: E,
    specialty_id: i64,
) -> HospitalResult<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM doctor_specialties WHERE specialty_id = ?")
            .bind(specialty_id)
            .fetch_one(ex)
            .await?;
    Ok(count)
}
