//! Login and registration form controllers
//!
//! Each form validates its fields synchronously, then hands off to the
//! credential store and names the page to show on success.

pub mod login;
pub mod register;

pub use login::LoginForm;
pub use register::{RegisterForm, check_confirmation_field, check_email_field};

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::error::AuthError;

pub const FIELD_EMAIL: &str = "email";
pub const FIELD_PASSWORD: &str = "password";
pub const FIELD_FULL_NAME: &str = "fullName";
pub const FIELD_CONFIRM_PASSWORD: &str = "confirmPassword";
pub const FIELD_ROLE: &str = "role";
/// Form-wide error not tied to a single field
pub const FIELD_GENERAL: &str = "general";

/// Inline errors keyed by form field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single form-wide error
    pub fn general(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(FIELD_GENERAL, message);
        errors
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `Ok(())` when no field failed
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Successful submission and the page to navigate to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted<T> {
    pub value: T,
    pub redirect: &'static str,
}

/// Why a form submission did not go through
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Validation failed")]
    Invalid(FieldErrors),

    #[error(transparent)]
    Rejected(#[from] AuthError),
}

impl SubmitError {
    /// Errors as displayed on the form; store failures land under `general`
    pub fn field_errors(&self) -> FieldErrors {
        match self {
            SubmitError::Invalid(errors) => errors.clone(),
            SubmitError::Rejected(e) => FieldErrors::general(e.to_string()),
        }
    }
}
