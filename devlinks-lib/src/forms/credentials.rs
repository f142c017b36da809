use std::fmt::{self, Debug, Formatter};

use strum::Display;
use thiserror::Error;

use crate::{
    Result, ValidationError, auth,
    gateway::{IdentityProvider, Session},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CredentialField {
    #[strum(to_string = "Email address")]
    Email,
    Password,
    #[strum(to_string = "Confirm password")]
    ConfirmPassword,
}

/// A message attached to one input of a login or signup form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: CredentialField,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: CredentialField, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Find the message for `field` among `errors`.
pub fn message_for(errors: &[FieldError], field: CredentialField) -> Option<&'static str> {
    errors
        .iter()
        .find(|error| error.field == field)
        .map(|error| error.message)
}

#[derive(Default, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.email.is_empty() {
            errors.push(FieldError::new(CredentialField::Email, "Can't be empty"));
        }
        if self.password.is_empty() {
            errors.push(FieldError::new(
                CredentialField::Password,
                "Please check again",
            ));
        }

        errors
    }

    pub fn submit<P>(&self, provider: &P) -> Result<Session>
    where
        P: IdentityProvider + ?Sized,
    {
        let errors = self.errors();
        if !errors.is_empty() {
            return Err(ValidationError::Fields(errors).into());
        }

        auth::authenticate(provider, &self.email, &self.password)
    }
}

impl Debug for LoginForm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Default, Clone)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    pub fn errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.email.is_empty() {
            errors.push(FieldError::new(CredentialField::Email, "Can't be empty"));
        }
        if self.password.is_empty() {
            errors.push(FieldError::new(
                CredentialField::Password,
                "Please enter a password",
            ));
        } else if self.password != self.confirm_password {
            errors.push(FieldError::new(
                CredentialField::ConfirmPassword,
                "Passwords do not match",
            ));
        }

        errors
    }

    pub fn submit<P>(&self, provider: &P) -> Result<Session>
    where
        P: IdentityProvider + ?Sized,
    {
        let errors = self.errors();
        if !errors.is_empty() {
            return Err(ValidationError::Fields(errors).into());
        }

        auth::register(
            provider,
            &self.email,
            &self.password,
            &self.confirm_password,
        )
    }
}

impl Debug for SignupForm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupForm")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}
