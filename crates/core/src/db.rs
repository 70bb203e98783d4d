//! SQLite pool construction and schema creation.
//!
//! The schema is created statement-by-statement at startup; every table
//! uses `IF NOT EXISTS` so restarting against an existing database is a
//! no-op. Unique constraints back the service-level uniqueness rules
//! (specialty name, doctor CRM and email, patient CPF, one medical record
//! per appointment).

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::HospitalResult;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS specialties (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS doctors (
        id    INTEGER PRIMARY KEY AUTOINCREMENT,
        name  TEXT NOT NULL,
        crm   TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        phone TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS doctor_specialties (
        doctor_id    INTEGER NOT NULL REFERENCES doctors (id),
        specialty_id INTEGER NOT NULL REFERENCES specialties (id),
        PRIMARY KEY (doctor_id, specialty_id)
    )",
    "CREATE TABLE IF NOT EXISTS patients (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        name       TEXT NOT NULL,
        cpf        TEXT NOT NULL UNIQUE,
        birth_date TEXT NOT NULL,
        email      TEXT NOT NULL,
        phone      TEXT NOT NULL,
        address    TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS appointments (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        doctor_id  INTEGER NOT NULL REFERENCES doctors (id),
        patient_id INTEGER NOT NULL REFERENCES patients (id),
        date_time  TEXT NOT NULL,
        status     TEXT NOT NULL DEFAULT 'AGENDADA',
        note       TEXT
    )",
    "CREATE TABLE IF NOT EXISTS medical_records (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        appointment_id INTEGER NOT NULL UNIQUE REFERENCES appointments (id),
        anamnesis      TEXT NOT NULL,
        diagnosis      TEXT,
        treatment_plan TEXT,
        created_at     TEXT NOT NULL,
        updated_at     TEXT
    )",
    "CREATE TABLE IF NOT EXISTS prescriptions (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        appointment_id INTEGER NOT NULL REFERENCES appointments (id),
        medication     TEXT NOT NULL,
        dosage         TEXT NOT NULL,
        notes          TEXT,
        issued_at      TEXT NOT NULL,
        valid_until    TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS exams (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        appointment_id INTEGER NOT NULL REFERENCES appointments (id),
        name           TEXT NOT NULL,
        exam_type      TEXT NOT NULL,
        instructions   TEXT,
        requested_at   TEXT NOT NULL,
        result         TEXT,
        result_at      TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_appointments_doctor_date
        ON appointments (doctor_id, date_time)",
];

/// Open a pool against `database_url`, creating the database file when it
/// does not exist yet.
pub async fn connect(database_url: &str) -> HospitalResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    Ok(pool)
}

/// Create the schema. Safe to run on every startup.
pub async fn init_schema(pool: &SqlitePool) -> HospitalResult<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Pool over a private in-memory database, schema applied.
///
/// A single connection is pinned for the pool's lifetime; an in-memory
/// SQLite database lives and dies with its connection.
pub async fn memory_pool() -> HospitalResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    init_schema(&pool).await?;
    Ok(pool)
}
