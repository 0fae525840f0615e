//! Request validation helpers shared by the domain modules.

use serde_json::{json, Value};
use shelf_http::error::AppError;

/// Collects per-field validation failures before turning them into one error.
#[derive(Debug, Default)]
pub struct Violations {
    details: Vec<Value>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `error` against `field` unless `ok` holds.
    pub fn check(&mut self, ok: bool, field: &str, error: &str) -> &mut Self {
        if !ok {
            self.details.push(json!({ "field": field, "error": error }));
        }
        self
    }

    pub fn require_text(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(!value.trim().is_empty(), field, "must not be empty")
    }

    pub fn require_positive(&mut self, field: &str, value: i32) -> &mut Self {
        self.check(value > 0, field, "must be greater than zero")
    }

    pub fn require_email(&mut self, field: &str, value: &str) -> &mut Self {
        let valid = value
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
        self.check(valid, field, "must be an email address")
    }

    /// `Ok` when nothing was recorded, otherwise a 422 carrying every failure.
    pub fn finish(&mut self, message: &str) -> Result<(), AppError> {
        if self.details.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(std::mem::take(&mut self.details), message))
        }
    }
}

/// Reject a body whose `id` disagrees with the id in the path.
pub fn ensure_same_id(path_id: i32, body_id: Option<i32>) -> Result<(), AppError> {
    match body_id {
        Some(body_id) if body_id != path_id => Err(AppError::bad_request(format!(
            "body id {} does not match path id {}",
            body_id, path_id
        ))),
        _ => Ok(()),
    }
}
