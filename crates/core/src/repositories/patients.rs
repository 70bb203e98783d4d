//! Patient queries.

use sqlx::SqliteExecutor;

use crate::error::HospitalResult;
use crate::models::Patient;

const COLUMNS: &str = "id, name, cpf, birth_date, email, phone, address";

pub async fn list_all<'e, E: SqliteExecutor<'e>>(ex: E) -> HospitalResult<Vec<Patient>> {
    let rows = sqlx::query_as::<_, Patient>(&format!(
        "SELECT {COLUMNS} FROM patients ORDER BY id"
    ))
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(
    ex: E,
    id: i64,
) -> HospitalResult<Option<Patient>> {
    let row = sqlx::query_as::<_, Patient>(&format!(
        "SELECT {COLUMNS} FROM patients WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn find_by_cpf<'e, E: SqliteExecutor<'e>>(
    ex: E,
    cpf: &str,
) -> HospitalResult<Option<Patient>> {
    let row = sqlx::query_as::<_, Patient>(&format!(
        "SELECT {COLUMNS} FROM patients WHERE cpf = ?"
    ))
    .bind(cpf)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn search_by_name<'e, E: SqliteExecutor<'e>>(
    ex: E,
    name: &str,
) -> HospitalResult<Vec<Patient>> {
    let rows = sqlx::query_as::<_, Patient>(&format!(
        "SELECT {COLUMNS} FROM patients WHERE name LIKE ? ORDER BY name"
    ))
    .bind(format!("%{name}%"))
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

#[allow(clippy::too_many_arguments)]
pub async fn insert<'e, E: SqliteExecutor<'e>>(
    ex: E,
    name: &str,
    cpf: &str,
    birth_date: chrono::NaiveDate,
    email: &str,
    phone: &str,
    address: &str,
) -> HospitalResult<i64> {
    let result = sqlx::query(
        "INSERT INTO patients (name, cpf, birth_date, email, phone, address)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(name)
    .bind(cpf)
    .bind(birth_date)
    .bind(email)
    .bind(phone)
    .bind(address)
    .execute(ex)
    .await?;
    Ok(result.last_insert_rowid())
}

#[allow(clippy::too_many_arguments)]
pub async fn update<'e, E: SqliteExecutor<'e>>(
    ex: E,
    id: i64,
    name: &str,
    cpf: &str,
    birth_date: chrono::NaiveDate,
    email: &str,
    phone: &str,
    address: &str,
) -> HospitalResult<()> {
    sqlx::query(
        "UPDATE patients
         SET name = ?, cpf = ?, birth_date = ?, email = ?, phone = ?, address = ?
         WHERE id = ?",
    )
    .bind(name)
    .bind(cpf)
    .bind(birth_date)
    .bind(email)
    .bind(phone)
    .bind(address)
    .bind(id)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn delete<'e, E: SqliteExecutor<'e>>(ex: E, id: i64) -> HospitalResult<()> {
    sqlx::query("DELETE FROM patients WHERE id = ?")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(())
}

/// Number of appointments referencing this patient; gates deletion.
pub async fn count_appointments<'e, E: SqliteExecutor<'e>>(
    ex: E,
    patient_id: i64,
) -> HospitalResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM appointments WHERE patient_id = ?")
        .bind(patient_id)
        .fetch_one(ex)
        .await?;
    Ok(count)
}
