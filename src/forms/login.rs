use serde::Deserialize;

use crate::auth::CredentialStore;
use crate::constants::{ERR_EMAIL_INVALID, ERR_EMAIL_REQUIRED, ERR_PASSWORD_REQUIRED, LOGIN_REDIRECT};
use crate::forms::{FIELD_EMAIL, FIELD_PASSWORD, FieldErrors, SubmitError, Submitted};
use crate::models::UserProfile;
use crate::validation::validate_email;

/// Login form input
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Required-field and email-shape checks; password rules are not applied
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.email.is_empty() {
            errors.insert(FIELD_EMAIL, ERR_EMAIL_REQUIRED);
        } else if !validate_email(&self.email) {
            errors.insert(FIELD_EMAIL, ERR_EMAIL_INVALID);
        }

        if self.password.is_empty() {
            errors.insert(FIELD_PASSWORD, ERR_PASSWORD_REQUIRED);
        }

        errors.into_result()
    }

    /// Validate, then log in; navigates to the home page on success
    pub fn submit(&self, store: &CredentialStore) -> Result<Submitted<UserProfile>, SubmitError> {
        self.validate().map_err(SubmitError::Invalid)?;

        let user = store.login(&self.email, &self.password)?;

        Ok(Submitted {
            value: user,
            redirect: LOGIN_REDIRECT,
        })
    }
}
