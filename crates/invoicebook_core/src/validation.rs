//! Caller-side input checks for client and invoice payloads.
//!
//! # Responsibility
//! - Reproduce the form-level rules applied before data reaches the store.
//! - Back the store's optional strict mode with the same rules.
//!
//! # Invariants
//! - Required text must be non-empty after trimming.
//! - Emails must match `local@domain.tld` with no whitespace.
//! - Amounts must be finite and strictly positive.

use crate::model::client::{ClientPatch, NewClient};
use crate::model::invoice::{InvoicePatch, NewInvoice};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Shape-check failure for a submitted payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required text field is empty or whitespace.
    EmptyField(&'static str),
    InvalidEmail(String),
    /// Amount is zero, negative, or not a finite number.
    InvalidAmount(f64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} is required"),
            Self::InvalidEmail(value) => write!(f, "invalid email address: `{value}`"),
            Self::InvalidAmount(value) => write!(f, "amount must be positive, got {value}"),
        }
    }
}

impl Error for ValidationError {}

pub fn validate_required(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn validate_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn validate_amount(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if validate_required(value) {
        Ok(())
    } else {
        Err(ValidationError::EmptyField(field))
    }
}

fn require_email(value: &str) -> Result<(), ValidationError> {
    require("email", value)?;
    if validate_email(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(value.to_string()))
    }
}

fn require_amount(value: f64) -> Result<(), ValidationError> {
    if validate_amount(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidAmount(value))
    }
}

impl NewClient {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require_email(&self.email)
    }
}

impl ClientPatch {
    /// Checks only the fields the patch supplies.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require("name", name)?;
        }
        if let Some(email) = &self.email {
            require_email(email)?;
        }
        Ok(())
    }
}

impl NewInvoice {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require_amount(self.amount)
    }
}

impl InvoicePatch {
    /// Checks only the fields the patch supplies.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            require("title", title)?;
        }
        if let Some(amount) = self.amount {
            require_amount(amount)?;
        }
        Ok(())
    }
}
