//! Per-entity services.
//!
//! Services own the business rules: existence checks on referenced ids,
//! the appointment lifecycle, uniqueness pre-checks and referential
//! delete guards. Every mutating operation runs inside one transaction;
//! plain reads go straight to the pool.

pub mod appointments;
pub mod doctors;
pub mod exams;
pub mod medical_records;
pub mod patients;
pub mod prescriptions;
pub mod specialties;
