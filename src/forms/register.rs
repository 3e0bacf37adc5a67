use serde::Deserialize;

use crate::auth::CredentialStore;
use crate::constants::{
    ERR_CONFIRM_REQUIRED, ERR_EMAIL_INVALID, ERR_EMAIL_REQUIRED, ERR_FULL_NAME_REQUIRED,
    ERR_FULL_NAME_TOO_SHORT, ERR_PASSWORD_REQUIRED, ERR_PASSWORD_RULES, ERR_PASSWORDS_MISMATCH,
    ERR_ROLE_REQUIRED, MIN_FULL_NAME_LENGTH, REGISTER_REDIRECT,
};
use crate::forms::{
    FIELD_CONFIRM_PASSWORD, FIELD_EMAIL, FIELD_FULL_NAME, FIELD_PASSWORD, FIELD_ROLE, FieldErrors,
    SubmitError, Submitted,
};
use crate::models::{NewUser, Role};
use crate::validation::{is_form_whitespace, utf16_len, validate_email, validate_password};

/// Registration form input
///
/// `role` stays a raw string so an unselected or unknown role surfaces as a
/// field error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: String,
}

impl RegisterForm {
    /// Run every field check, returning the registration payload when all pass
    pub fn validate(&self) -> Result<NewUser, FieldErrors> {
        let mut errors = FieldErrors::new();

        let trimmed_name = self.full_name.trim_matches(is_form_whitespace);
        if trimmed_name.is_empty() {
            errors.insert(FIELD_FULL_NAME, ERR_FULL_NAME_REQUIRED);
        } else if utf16_len(trimmed_name) < MIN_FULL_NAME_LENGTH {
            errors.insert(FIELD_FULL_NAME, ERR_FULL_NAME_TOO_SHORT);
        }

        if self.email.is_empty() {
            errors.insert(FIELD_EMAIL, ERR_EMAIL_REQUIRED);
        } else if !validate_email(&self.email) {
            errors.insert(FIELD_EMAIL, ERR_EMAIL_INVALID);
        }

        if self.password.is_empty() {
            errors.insert(FIELD_PASSWORD, ERR_PASSWORD_REQUIRED);
        } else if !validate_password(&self.password) {
            errors.insert(FIELD_PASSWORD, ERR_PASSWORD_RULES);
        }

        if self.confirm_password.is_empty() {
            errors.insert(FIELD_CONFIRM_PASSWORD, ERR_CONFIRM_REQUIRED);
        } else if self.password != self.confirm_password {
            errors.insert(FIELD_CONFIRM_PASSWORD, ERR_PASSWORDS_MISMATCH);
        }

        let role = self.role.parse::<Role>().ok();
        if role.is_none() {
            errors.insert(FIELD_ROLE, ERR_ROLE_REQUIRED);
        }

        match role {
            Some(role) if errors.is_empty() => Ok(NewUser {
                full_name: self.full_name.clone(),
                email: self.email.clone(),
                role,
            }),
            _ => Err(errors),
        }
    }

    /// Validate, then register; navigates to the login page on success
    pub fn submit(&self, store: &CredentialStore) -> Result<Submitted<()>, SubmitError> {
        let new_user = self.validate().map_err(SubmitError::Invalid)?;

        store.register(new_user, &self.password)?;

        Ok(Submitted {
            value: (),
            redirect: REGISTER_REDIRECT,
        })
    }
}

/// Inline email error shown while typing; an empty field shows none yet
pub fn check_email_field(email: &str) -> Option<&'static str> {
    (!email.is_empty() && !validate_email(email)).then_some(ERR_EMAIL_INVALID)
}

/// Inline confirmation error shown while typing either password field
pub fn check_confirmation_field(password: &str, confirm_password: &str) -> Option<&'static str> {
    (!confirm_password.is_empty() && password != confirm_password).then_some(ERR_PASSWORDS_MISMATCH)
}
