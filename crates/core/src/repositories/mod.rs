//! Thin per-entity query layer.
//!
//! Every function takes any SQLite executor, so the services can run the
//! same queries against the pool for plain reads and against an open
//! transaction for guarded writes. No business rule lives here.

pub mod appointments;
pub mod doctors;
pub mod exams;
pub mod medical_records;
pub mod patients;
pub mod prescriptions;
pub mod specialties;
