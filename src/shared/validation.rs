//! Form validation
//!
//! Incoming forms are checked for shape before any flow touches the store.
//! Failures are collected per field so the client can fix all of them at
//! once.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Message shared by every validation failure.
pub const VALIDATION_MESSAGE: &str = "you have validation errors";

/// Field name to error message map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a single-field error.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record an error for `field`. The first message per field wins.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(VALIDATION_MESSAGE)
    }
}

impl std::error::Error for ValidationErrors {}

/// Implemented by forms that can check their own shape.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Require a non-blank value whose length (in chars) lies in `min..=max`.
pub fn check_length(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    min: usize,
    max: Option<usize>,
) {
    if value.trim().is_empty() {
        errors.add(field, "cannot be blank");
        return;
    }
    let len = value.chars().count();
    if len < min {
        errors.add(field, format!("must be at least {} characters", min));
    } else if let Some(max) = max {
        if len > max {
            errors.add(field, format!("must be at most {} characters", max));
        }
    }
}

/// Require something shaped like `local@domain.tld`, at most `max` chars long.
pub fn check_email(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    if value.trim().is_empty() {
        errors.add(field, "cannot be blank");
        return;
    }
    if value.chars().count() > max {
        errors.add(field, format!("must be at most {} characters", max));
    } else if !is_email(value) {
        errors.add(field, "must be a valid email address");
    }
}

fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((name, tld)) => !name.is_empty() && tld.len() >= 2,
        None => false,
    }
}
