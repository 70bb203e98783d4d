//! Exam queries.

use chrono::NaiveDateTime;
use sqlx::SqliteExecutor;

use crate::error::HospitalResult;
use crate::models::{Exam, ExamType};

const COLUMNS: &str =
    "id, appointment_id, name, exam_type, instructions, requested_at, result, result_at";

pub async fn list_all<'e, E: SqliteExecutor<'e>>(ex: E) -> HospitalResult<Vec<Exam>> {
    let rows = sqlx::query_as::<_, Exam>(&format!(
        "SELECT {COLUMNS} FROM exams ORDER BY id"
    ))
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(ex: E, id: i64) -> HospitalResult<Option<Exam>> {
    let row = sqlx::query_as::<_, Exam>(&format!(
        "SELECT {COLUMNS} FROM exams WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn list_by_appointment<'e, E: SqliteExecutor<'e>>(
    ex: E,
    appointment_id: i64,
) -> HospitalResult<Vec<Exam>> {
    let rows = sqlx::query_as::<_, Exam>(&format!(
        "SELECT {COLUMNS} FROM exams WHERE appointment_id = ? ORDER BY requested_at"
    ))
    .bind(appointment_id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

/// Exams across every appointment of the patient, newest request first.
pub async fn list_by_patient<'e, E: SqliteExecutor<'e>>(
    ex: E,
    patient_id: i64,
) -> HospitalResult<Vec<Exam>> {
    let rows = sqlx::query_as::<_, Exam>(
        "SELECT e.id, e.appointment_id, e.name, e.exam_type, e.instructions,
                e.requested_at, e.result, e.result_at
         FROM exams e
         JOIN appointments a ON a.id = e.appointment_id
         WHERE a.patient_id = ?
         ORDER BY e.requested_at DESC",
    )
    .bind(patient_id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn list_by_type<'e, E: SqliteExecutor<'e>>(
    ex: E,
    exam_type: ExamType,
) -> HospitalResult<Vec<Exam>> {
    let rows = sqlx::query_as::<_, Exam>(&format!(
        "SELECT {COLUMNS} FROM exams WHERE exam_type = ? ORDER BY requested_at"
    ))
    .bind(exam_type)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

/// Exams still waiting for a result.
pub async fn list_pending<'e, E: SqliteExecutor<'e>>(ex: E) -> HospitalResult<Vec<Exam>> {
    let rows = sqlx::query_as::<_, Exam>(&format!(
        "SELECT {COLUMNS} FROM exams WHERE result IS NULL ORDER BY requested_at"
    ))
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

#[allow(clippy::too_many_arguments)]
pub async fn insert<'e, E: SqliteExecutor<'e>>(
    ex: E,
    appointment_id: i64,
    name: &str,
    exam_type: ExamType,
    instructions: Option<&str>,
    requested_at: NaiveDateTime,
    result: Option<&str>,
    result_at: Option<NaiveDateTime>,
) -> HospitalResult<i64> {
    let insert = sqlx::query(
        "INSERT INTO exams (appointment_id, name, exam_type, instructions, requested_at, result, result_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(appointment_id)
    .bind(name)
    .bind(exam_type)
    .bind(instructions)
    .bind(requested_at)
    .bind(result)
    .bind(result_at)
    .execute(ex)
    .await?;
    Ok(insert.last_insert_rowid())
}

#[allow(clippy::too_many_arguments)]
pub async fn update<'e, E: SqliteExecutor<'e>>(
    ex: E,
    id: i64,
    name: &str,
    exam_type: ExamType,
    instructions: Option<&str>,
    result: Option<&str>,
    result_at: Option<NaiveDateTime>,
) -> HospitalResult<()> {
    sqlx::query(
        "UPDATE exams
         SET name = ?, exam_type = ?, instructions = ?, result = ?, result_at = ?
         WHERE id = ?",
    )
    .bind(name)
    .bind(exam_type)
    .bind(instructions)
    .bind(result)
    .bind(result_at)
    .bind(id)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn set_result<'e, E: SqliteExecutor<'e>>(
    ex: E,
    id: i64,
    result: &str,
    result_at: NaiveDateTime,
) -> HospitalResult<()> {
    sqlx::query("UPDATE exams SET result = ?, result_at = ? WHERE id = ?")
        .bind(result)
        .bind(result_at)
        .bind(id)
        .execute(ex)
        .await?;
    Ok(())
}

pub async fn delete<'e, E: SqliteExecutor<'e>>(ex: E, id: i64) -> HospitalResult<()> {
    sqlx::query("DELETE FROM exams WHERE id = ?")
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
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exams WHERE appointment_id = ?")
        .bind(appointment_id)
        .fetch_one(ex)
        .await?;
    Ok(count)
}
