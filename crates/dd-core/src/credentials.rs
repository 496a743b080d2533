//! Login inputs: phone number, password and PIN.
//!
//! Values in this module are only constructed through their validating
//! parsers, so holding a `PhoneNumber` or a `Pin` means the local checks
//! already passed and a remote call may be issued.

use std::fmt::{Display, Formatter};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::security::SecretString;

/// Optional `+`, then 2 to 15 digits with a non-zero leading digit.
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("phone pattern is valid"));

pub const PIN_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("Please fill in both the phone number and the password")]
    MissingField,
    #[error("Please enter a valid phone number")]
    InvalidPhone,
    #[error("Please enter the complete 6-digit PIN")]
    InvalidPin,
}

/// International-format phone number with whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str) -> Result<Self, CredentialError> {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(CredentialError::MissingField);
        }
        if !PHONE_PATTERN.is_match(&compact) {
            return Err(CredentialError::InvalidPhone);
        }
        Ok(Self(compact))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Six-digit verification PIN.
#[derive(Debug, PartialEq, Eq)]
pub struct Pin(SecretString);

impl Pin {
    pub fn parse(raw: &str) -> Result<Self, CredentialError> {
        let trimmed = raw.trim();
        if trimmed.len() != PIN_LENGTH || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CredentialError::InvalidPin);
        }
        Ok(Self(SecretString::new(trimmed)))
    }

    pub fn expose(&self) -> &str {
        self.0.expose()
    }
}

/// Phone and password held in memory between the login and PIN steps.
#[derive(Debug, PartialEq, Eq)]
pub struct TransientCredentials {
    pub phone: PhoneNumber,
    pub password: SecretString,
}

impl TransientCredentials {
    /// Validate raw form input. Empty inputs are reported before format errors.
    pub fn parse(phone: &str, password: SecretString) -> Result<Self, CredentialError> {
        if phone.trim().is_empty() || password.is_empty() {
            return Err(CredentialError::MissingField);
        }
        let phone = PhoneNumber::parse(phone)?;
        Ok(Self { phone, password })
    }
}
