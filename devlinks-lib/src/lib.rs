//! Core of devlinks, a link-in-bio profile editor.
//!
//! Front ends drive the form stores in [`forms`], which validate user input locally and hand
//! narrowed snapshots to the service boundaries in [`gateway`]. [`Repository`] implements those
//! boundaries on top of an embedded database.

use thiserror::Error;

use crate::{
    forms::credentials::FieldError, gateway::ProviderError, repository::config::ConfigError,
};

pub mod auth;
pub mod forms;
pub mod fs;
pub mod gateway;
pub mod platform;
pub mod repository;

pub use gateway::{DocumentStore, FileStorage, IdentityProvider, Link, Session, UserDocument};
pub use platform::Platform;
pub use repository::Repository;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Please fill in all fields.")]
    IncompleteForm,
    #[error("You can only add up to {0} links.")]
    CapacityExceeded(usize),
    #[error("A save is already in progress")]
    SaveInProgress,
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Warnings leave the form untouched and need no correction from the user.
    pub fn is_warning(&self) -> bool {
        matches!(self, Error::CapacityExceeded(_))
    }

    /// Whether this error was raised locally before any service was contacted.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::IncompleteForm
                | Error::CapacityExceeded(_)
                | Error::SaveInProgress
        )
    }
}

/// Input rejected before it reached a service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("{}", join_fields(.0))]
    Fields(Vec<FieldError>),
    #[error("Please check the URL of {invalid} link(s)")]
    InvalidLinks { invalid: usize },
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
