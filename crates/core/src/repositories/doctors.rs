//! Doctor queries, including the specialty join table.

use sqlx::SqliteExecutor;

use crate::error::HospitalResult;
use crate::models::Doctor;

const COLUMNS: &str = "id, name, crm, email, phone";

pub async fn list_all<'e, E: SqliteExecutor<'e>>(ex: E) -> HospitalResult<Vec<Doctor>> {
    let rows =
        sqlx::query_as::<_, Doctor>("SELECT id, name, crm, email, phone FROM doctors ORDER BY id")
            .fetch_all(ex)
            .await?;
    Ok(rows)
}

pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(ex: E, id: i64) -> HospitalResult<Option<Doctor>> {
    let row = sqlx::query_as::<_, Doctor>(&format!(
        "SELECT {COLUMNS} FROM doctors WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn find_by_crm<'e, E: SqliteExecutor<'e>>(
    ex: E,
    crm: &str,
) -> HospitalResult<Option<Doctor>> {
    let row = sqlx::query_as::<_, Doctor>(&format!(
        "SELECT {COLUMNS} FROM doctors WHERE crm = ?"
    ))
    .bind(crm)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn search_by_name<'e, E: SqliteExecutor<'e>>(
    ex: E,
    name: &str,
) -> HospitalResult<Vec<Doctor>> {
    let rows = sqlx::query_as::<_, Doctor>(&format!(
        "SELECT {COLUMNS} FROM doctors WHERE name LIKE ? ORDER BY name"
    ))
    .bind(format!("%{name}%"))
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn list_by_specialty<'e, E: SqliteExecutor<'e>>(
    ex: E,
    specialty_id: i64,
) -> HospitalResult<Vec<Doctor>> {
    let rows = sqlx::query_as::<_, Doctor>(
        "SELECT d.id, d.name, d.crm, d.email, d.phone
         FROM doctors d
         JOIN doctor_specialties ds ON ds.doctor_id = d.id
         WHERE ds.specialty_id = ?
         ORDER BY d.name",
    )
    .bind(specialty_id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn insert<'e, E: SqliteExecutor<'e>>(
    ex: E,
    name: &str,
    crm: &str,
    email: &str,
    phone: &str,
) -> HospitalResult<i64> {
    let result =
        sqlx::query("INSERT INTO doctors (name, crm, email, phone) VALUES (?, ?, ?, ?)")
            .bind(name)
            .bind(crm)
            .bind(email)
            .bind(phone)
            .execute(ex)
            .await?;
    Ok(result.last_insert_rowid())
}

pub async fn update<'e, E: SqliteExecutor<'e>>(
    ex: E,
    id: i64,
    name: &str,
    crm: &str,
    email: &str,
    phone: &str,
) -> HospitalResult<()> {
    sqlx::query("UPDATE doctors SET name = ?, crm = ?, email = ?, phone = ? WHERE id = ?")
        .bind(name)
        .bind(crm)
        .bind(email)
        .bind(phone)
        .bind(id)
        .execute(ex)
        .await?;
    Ok(())
}

pub async fn delete<'e, E: SqliteExecutor<'e>>(ex: E, id: i64) -> HospitalResult<()> {
    sqlx::query("DELETE FROM doctors WHERE id = ?")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(())
}

pub async fn specialty_ids<'e, E: SqliteExecutor<'e>>(
    ex: E,
    doctor_id: i64,
) -> HospitalResult<Vec<i64>> {
    let ids: Vec<i64> = sqlx::query_scalar(
        "SELECT specialty_id FROM doctor_specialties WHERE doctor_id = ? ORDER BY specialty_id",
    )
    .bind(doctor_id)
    .fetch_all(ex)
    .await?;
    Ok(ids)
}

pub async fn clear_specialties<'e, E: SqliteExecutor<'e>>(
    ex: E,
    doctor_id: i64,
) -> HospitalResult<()> {
    sqlx::query("DELETE FROM doctor_specialties WHERE doctor_id = ?")
        .bind(doctor_id)
        .execute(ex)
        .await?;
    Ok(())
}

pub async fn add_specialty<'e, E: SqliteExecutor<'e>>(
    ex: E,
    doctor_id: i64,
    specialty_id: i64,
) -> HospitalResult<()> {
    sqlx::query(
        "INSERT OR IGNORE INTO doctor_specialties (doctor_id, specialty_id) VALUES (?, ?)",
    )
    .bind(doctor_id)
    .bind(specialty_id)
    .execute(ex)
    .await?;
    Ok(())
}

/// Number of appointments referencing this doctor; gates deletion.
pub async fn count_appointments<'e, E: SqliteExecutor<'e>>(
    ex: E,
    doctor_id: i64,
) -> HospitalResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM appointments WHERE doctor_id = ?")
        .bind(doctor_id)
        .fetch_one(ex)
        .await?;
    Ok(count)
}
