//! Field validation helpers.
//!
//! Request DTOs collect their constraint failures into a [`FieldErrors`]
//! accumulator so a single response can report every bad field at once.
//! Messages follow the `field: message` shape surfaced in the error body.

use crate::error::{HospitalError, HospitalResult};

/// Accumulator for per-field validation failures.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.errors.push(format!("{field}: {message}"));
    }

    /// Required text with length bounds. A blank value reports only the
    /// missing-field message.
    pub fn require_text(&mut self, field: &str, value: &str, min: usize, max: usize) {
        if value.trim().is_empty() {
            self.add(field, "is required");
            return;
        }
        self.length_between(field, value, min, max);
    }

    /// Length bounds on an already-present value.
    pub fn length_between(&mut self, field: &str, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len < min || len > max {
            if min <= 1 {
                self.add(field, &format!("must have at most {max} characters"));
            } else {
                self.add(field, &format!("must have between {min} and {max} characters"));
            }
        }
    }

    /// Optional text capped at `max` characters.
    pub fn optional_max(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(value) = value {
            if value.chars().count() > max {
                self.add(field, &format!("must have at most {max} characters"));
            }
        }
    }

    /// Required value made of `min`..=`max` ASCII digits.
    pub fn require_digits(&mut self, field: &str, value: &str, min: usize, max: usize) {
        if value.trim().is_empty() {
            self.add(field, "is required");
            return;
        }
        let digits = value.len() >= min && value.len() <= max
            && value.bytes().all(|b| b.is_ascii_digit());
        if !digits {
            if min == max {
                self.add(field, &format!("must have exactly {min} digits"));
            } else {
                self.add(field, &format!("must have between {min} and {max} digits"));
            }
        }
    }

    /// Required value with a plausible email shape.
    pub fn require_email(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "is required");
            return;
        }
        if !is_email(value) {
            self.add(field, "is not a valid email address");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Consume the accumulator, failing with `HospitalError::Validation`
    /// when anything was reported.
    pub fn finish(self) -> HospitalResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(HospitalError::Validation(self.errors))
        }
    }
}

/// Minimal structural check: one `@`, non-empty local part, and a domain
/// containing a dot that is neither leading nor trailing.
fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || value.contains(char::is_whitespace) {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}
