//! Medical record queries.

use chrono::NaiveDateTime;
use sqlx::SqliteExecutor;

use crate::error::HospitalResult;
use crate::models::MedicalRecord;

const COLUMNS: &str =
    "id, appointment_id, anamnesis, diagnosis, treatment_plan, created_at, updated_at";

pub async fn list_all<'e, E: SqliteExecutor<'e>>(ex: E) -> HospitalResult<Vec<MedicalRecord>> {
    let rows = sqlx::query_as::<_, MedicalRecord>(&format!(
        "SELECT {COLUMNS} FROM medical_records ORDER BY id"
    ))
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(
    ex: E,
    id: i64,
) -> HospitalResult<Option<MedicalRecord>> {
    let row = sqlx::query_as::<_, MedicalRecord>(&format!(
        "SELECT {COLUMNS} FROM medical_records WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn find_by_appointment<'e, E: SqliteExecutor<'e>>(
    ex: E,
    appointment_id: i64,
) -> HospitalResult<Option<MedicalRecord>> {
    let row = sqlx::query_as::<_, MedicalRecord>(&format!(
        "SELECT {COLUMNS} FROM medical_records WHERE appointment_id = ?"
    ))
    .bind(appointment_id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

/// Records of every appointment the patient has had, newest first.
pub async fn list_by_patient<'e, E: SqliteExecutor<'e>>(
    ex: E,
    patient_id: i64,
) -> HospitalResult<Vec<MedicalRecord>> {
    let rows = sqlx::query_as::<_, MedicalRecord>(
        "SELECT r.id, r.appointment_id, r.anamnesis, r.diagnosis, r.treatment_plan,
                r.created_at, r.updated_at
         FROM medical_records r
         JOIN appointments a ON a.id = r.appointment_id
         WHERE a.patient_id = ?
         ORDER BY r.created_at DESC",
    )
    .bind(patient_id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn insert<'e, E: SqliteExecutor<'e>>(
    ex: E,
    appointment_id: i64,
    anamnesis: &str,
    diagnosis: Option<&str>,
    treatment_plan: Option<&str>,
    created_at: NaiveDateTime,
) -> HospitalResult<i64> {
    let result = sqlx::query(
        "INSERT INTO medical_records (appointment_id, anamnesis, diagnosis, treatment_plan, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(appointment_id)
    .bind(anamnesis)
    .bind(diagnosis)
    .bind(treatment_plan)
    .bind(created_at)
    .execute(ex)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn update<'e, E: SqliteExecutor<'e>>(
    ex: E,
    id: i64,
    anamnesis: &str,
    diagnosis: Option<&str>,
    treatment_plan: Option<&str>,
    updated_at: NaiveDateTime,
) -> HospitalResult<()> {
    sqlx::query(
        "UPDATE medical_records
         SET anamnesis = ?, diagnosis = ?, treatment_plan = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(anamnesis)
    .bind(diagnosis)
    .bind(treatment_plan)
    .bind(updated_at)
    .bind(id)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn delete<'e, E: SqliteExecutor<'e>>(ex: E, id: i64) -> HospitalResult<()> {
    sqlx::query("DELETE FROM medical_records WHERE id = ?")
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
        sqlx::query_scalar("SELECT COUNT(*) FROM medical_records WHERE appointment_id = ?")
            .bind(appointment_id)
            .fetch_one(ex)
            .await?;
    Ok(count)
}
