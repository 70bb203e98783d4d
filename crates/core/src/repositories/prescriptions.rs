//! Prescription queries.

use chrono::NaiveDateTime;
use sqlx::SqliteExecutor;

use crate::error::HospitalResult;
use crate::models::Prescription;

const COLUMNS: &str =
    "id, appointment_id, medication, dosage, notes, issued_at, valid_until";

pub async fn list_all<'e, E: SqliteExecutor<'e>>(ex: E) -> HospitalResult<Vec<Prescription>> {
    let rows = sqlx::query_as::<_, Prescription>(&format!(
        "SELECT {COLUMNS} FROM prescriptions ORDER BY id"
    ))
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(
    ex: E,
    id: i64,
) -> HospitalResult<Option<Prescription>> {
    let row = sqlx::query_as::<_, Prescription>(&format!(
        "SELECT {COLUMNS} FROM prescriptions WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn list_by_appointment<'e, E: SqliteExecutor<'e>>(
    ex: E,
    appointment_id: i64,
) -> HospitalResult<Vec<Prescription>> {
    let rows = sqlx::query_as::<_, Prescription>(&format!(
        "SELECT {COLUMNS} FROM prescriptions WHERE appointment_id = ? ORDER BY id"
    ))
    .bind(appointment_id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn list_by_patient<'e, E: SqliteExecutor<'e>>(
    ex: E,
    patient_id: i64,
) -> HospitalResult<Vec<Prescription>> {
    let rows = sqlx::query_as::<_, Prescription>(
        "SELECT p.id, p.appointment_id, p.medication, p.dosage, p.notes,
                p.issued_at, p.valid_until
         FROM prescriptions p
         JOIN appointments a ON a.id = p.appointment_id
         WHERE a.patient_id = ?
         ORDER BY p.id",
    )
    .bind(patient_id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn search_by_medication<'e, E: SqliteExecutor<'e>>(
    ex: E,
    medication: &str,
) -> HospitalResult<Vec<Prescription>> {
    let rows = sqlx::query_as::<_, Prescription>(&format!(
        "SELECT {COLUMNS} FROM prescriptions WHERE medication LIKE ? ORDER BY id"
    ))
    .bind(format!("%{medication}%"))
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

#[allow(clippy::too_many_arguments)]
pub async fn insert<'e, E: SqliteExecutor<'e>>(
    ex: E,
    appointment_id: i64,
    medication: &str,
    dosage: &str,
    notes: Option<&str>,
    issued_at: NaiveDateTime,
    valid_until: NaiveDateTime,
) -> HospitalResult<i64> {
    let result = sqlx::query(
        "INSERT INTO prescriptions (appointment_id, medication, dosage, notes, issued_at, valid_until)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(appointment_id)
    .bind(medication)
    .bind(dosage)
    .bind(notes)
    .bind(issued_at)
    .bind(valid_until)
    .execute(ex)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn update<'e, E: SqliteExecutor<'e>>(
    ex: E,
    id: i64,
    medication: &str,
    dosage: &str,
    notes: Option<&str>,
    valid_until: NaiveDateTime,
) -> HospitalResult<()> {
    sqlx::query(
        "UPDATE prescriptions
         SET medication = ?, dosage = ?, notes = ?, valid_until = ?
         WHERE id = ?",
    )
    .bind(medication)
    .bind(dosage)
    .bind(notes)
    .bind(valid_until)
    .bind(id)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn delete<'e, E: SqliteExecutor<'e>>(ex: E, id: i64) -> HospitalResult<()> {
    sqlx::query("DELETE FROM prescriptions WHERE id = ?")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(())
}

/// Gates appointment deletion.
pub async fn count_by_appointment<'e, E: SqliteExecutor<'e>>(
    ex: E,
    appointment_id: i64,
) -> HospitalResult<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM prescriptions WHERE appointment_id = ?")
            .bind(appointment_id)
            .fetch_one(ex)
            .await?;
    Ok(count)
}
