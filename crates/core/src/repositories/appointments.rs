//! Appointment queries.
//!
//! All listings are ordered by `date_time` ascending. The availability
//! check mirrors the original scheduling query: a doctor is busy when any
//! non-canceled appointment of theirs starts inside the requested window.

use chrono::NaiveDateTime;
use sqlx::SqliteExecutor;

use crate::error::HospitalResult;
use crate::models::{Appointment, AppointmentStatus};

const COLUMNS: &str = "id, doctor_id, patient_id, date_time, status, note";

pub async fn list_all<'e, E: SqliteExecutor<'e>>(ex: E) -> HospitalResult<Vec<Appointment>> {
    let rows = sqlx::query_as::<_, Appointment>(&format!(
        "SELECT {COLUMNS} FROM appointments ORDER BY date_time"
    ))
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(
    ex: E,
    id: i64,
) -> HospitalResult<Option<Appointment>> {
    let row = sqlx::query_as::<_, Appointment>(&format!(
        "SELECT {COLUMNS} FROM appointments WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn list_by_doctor<'e, E: SqliteExecutor<'e>>(
    ex: E,
    doctor_id: i64,
) -> HospitalResult<Vec<Appointment>> {
    let rows = sqlx::query_as::<_, Appointment>(&format!(
        "SELECT {COLUMNS} FROM appointments WHERE doctor_id = ? ORDER BY date_time"
    ))
    .bind(doctor_id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn list_by_patient<'e, E: SqliteExecutor<'e>>(
    ex: E,
    patient_id: i64,
) -> HospitalResult<Vec<Appointment>> {
    let rows = sqlx::query_as::<_, Appointment>(&format!(
        "SELECT {COLUMNS} FROM appointments WHERE patient_id = ? ORDER BY date_time"
    ))
    .bind(patient_id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn list_by_status<'e, E: SqliteExecutor<'e>>(
    ex: E,
    status: AppointmentStatus,
) -> HospitalResult<Vec<Appointment>> {
    let rows = sqlx::query_as::<_, Appointment>(&format!(
        "SELECT {COLUMNS} FROM appointments WHERE status = ? ORDER BY date_time"
    ))
    .bind(status)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn list_by_date_range<'e, E: SqliteExecutor<'e>>(
    ex: E,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> HospitalResult<Vec<Appointment>> {
    let rows = sqlx::query_as::<_, Appointment>(&format!(
        "SELECT {COLUMNS} FROM appointments
         WHERE date_time >= ? AND date_time <= ?
         ORDER BY date_time"
    ))
    .bind(start)
    .bind(end)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

/// Non-canceled appointments of `doctor_id` starting inside
/// `[start, end]`. Zero means the slot is free.
pub async fn count_overlapping<'e, E: SqliteExecutor<'e>>(
    ex: E,
    doctor_id: i64,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> HospitalResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM appointments
         WHERE doctor_id = ? AND date_time BETWEEN ? AND ? AND status != ?",
    )
    .bind(doctor_id)
    .bind(start)
    .bind(end)
    .bind(AppointmentStatus::Canceled)
    .fetch_one(ex)
    .await?;
    Ok(count)
}

pub async fn insert<'e, E: SqliteExecutor<'e>>(
    ex: E,
    doctor_id: i64,
    patient_id: i64,
    date_time: NaiveDateTime,
    status: AppointmentStatus,
    note: Option<&str>,
) -> HospitalResult<i64> {
    let result = sqlx::query(
        "INSERT INTO appointments (doctor_id, patient_id, date_time, status, note)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(doctor_id)
    .bind(patient_id)
    .bind(date_time)
    .bind(status)
    .bind(note)
    .execute(ex)
    .await?;
    Ok(result.last_insert_rowid())
}

#[allow(clippy::too_many_arguments)]
pub async fn update<'e, E: SqliteExecutor<'e>>(
    ex: E,
    id: i64,
    doctor_id: i64,
    patient_id: i64,
    date_time: NaiveDateTime,
    status: AppointmentStatus,
    note: Option<&str>,
) -> HospitalResult<()> {
    sqlx::query(
        "UPDATE appointments
         SET doctor_id = ?, patient_id = ?, date_time = ?, status = ?, note = ?
         WHERE id = ?",
    )
    .bind(doctor_id)
    .bind(patient_id)
    .bind(date_time)
    .bind(status)
    .bind(note)
    .bind(id)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn set_status<'e, E: SqliteExecutor<'e>>(
    ex: E,
    id: i64,
    status: AppointmentStatus,
) -> HospitalResult<()> {
    sqlx::query("UPDATE appointments SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(ex)
        .await?;
    Ok(())
}

pub async fn delete<'e, E: SqliteExecutor<'e>>(ex: E, id: i64) -> HospitalResult<()> {
    sqlx::query("DELETE FROM appointments WHERE id = ?")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(())
}
