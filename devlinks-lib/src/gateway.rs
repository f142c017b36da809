//! Boundaries to the services that hold user state.
//!
//! Authentication, the per-user profile document and file storage are all reached through the
//! traits in this module. Everything that crosses them is an explicitly constructed record:
//! form-only state such as draft ids or validation messages never leaves the form stores.
//! [`Repository`](crate::Repository) implements every trait on top of a local database.

use derive_more::{Display, From};
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::Platform;

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Failures reported by a service. The message is meant to be shown to the user verbatim.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("An account with this email address already exists")]
    AccountExists,
    #[error("Password should be at least {min} characters")]
    WeakPassword { min: usize },
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Your session has expired, please log in again")]
    InvalidSession,
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),
    #[error("The requested item does not exist")]
    NotFound,
    #[error("The database is corrupted: {0}")]
    Corrupted(&'static str),
    #[error("The database was written by a newer version of devlinks (model {0})")]
    UnsupportedModelVersion(u64),
    #[error("Internal database error: {0}")]
    Database(#[from] agdb::DbError),
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Proof of a successful sign-in. Every document and file operation takes one.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters, Serialize, Deserialize)]
pub struct Session {
    #[getset(get_copy = "pub")]
    user_id: UserId,
    #[getset(get = "pub")]
    email: String,
    #[getset(get = "pub")]
    token: String,
}

impl Session {
    pub fn new(user_id: UserId, email: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
            token: token.into(),
        }
    }
}

/// A saved link, exactly as it is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub platform: Platform,
    pub url: String,
}

impl Link {
    pub fn new(platform: Platform, url: impl Into<String>) -> Self {
        Self {
            platform,
            url: url.into(),
        }
    }
}

/// The remote profile document of a single user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDocument {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile_image: Option<String>,
    pub links: Vec<Link>,
}

/// A partial update of a [`UserDocument`]. Fields left as `None` keep their stored value, while
/// `links` replaces the whole stored list when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub profile_image: Option<String>,
    pub links: Option<Vec<Link>>,
}

impl DocumentUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether any field besides the links is set.
    pub fn has_details(&self) -> bool {
        self.first_name.is_some()
            || self.last_name.is_some()
            || self.email.is_some()
            || self.profile_image.is_some()
    }

    /// Merge this update into `document`.
    pub fn apply(self, document: &mut UserDocument) {
        if let Some(first_name) = self.first_name {
            document.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            document.last_name = last_name;
        }
        if let Some(email) = self.email {
            document.email = email;
        }
        if let Some(profile_image) = self.profile_image {
            document.profile_image = Some(profile_image);
        }
        if let Some(links) = self.links {
            document.links = links;
        }
    }
}

/// Opaque reference to an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct FileHandle {
    #[getset(get = "pub")]
    path: String,
}

impl FileHandle {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

pub trait IdentityProvider {
    fn create_account(&self, email: &str, password: &str) -> ProviderResult<Session>;

    fn sign_in(&self, email: &str, password: &str) -> ProviderResult<Session>;

    fn sign_out(&self, session: &Session) -> ProviderResult<()>;
}

pub trait DocumentStore {
    fn fetch(&self, session: &Session) -> ProviderResult<UserDocument>;

    /// Merge `update` into the document owned by the session's user.
    fn update(&self, session: &Session, update: DocumentUpdate) -> ProviderResult<()>;
}

pub trait FileStorage {
    /// Store `data` under the relative `path`, replacing any previous file there.
    fn upload(&self, session: &Session, path: &str, data: &[u8]) -> ProviderResult<FileHandle>;

    fn public_url(&self, handle: &FileHandle) -> ProviderResult<String>;
}

/// A gateway double that records every call it receives.
#[cfg(test)]
pub(crate) mod testing {
    use std::cell::{Cell, RefCell};

    use super::*;

    #[derive(Debug, Default)]
    pub(crate) struct RecordingGateway {
        pub created_accounts: RefCell<Vec<String>>,
        pub sign_ins: Cell<usize>,
        pub sign_outs: Cell<usize>,
        pub updates: RefCell<Vec<DocumentUpdate>>,
        pub uploads: RefCell<Vec<String>>,
        pub document: RefCell<UserDocument>,
        pub fail_upload: Cell<bool>,
        pub fail_update: Cell<bool>,
        pub reject_sign_in: Cell<bool>,
    }

    impl RecordingGateway {
        pub fn session() -> Session {
            Session::new(UserId::from(7), "alex@example.com", "token")
        }

        pub fn update_count(&self) -> usize {
            self.updates.borrow().len()
        }
    }

    impl IdentityProvider for RecordingGateway {
        fn create_account(&self, email: &str, _password: &str) -> ProviderResult<Session> {
            self.created_accounts.borrow_mut().push(email.to_string());
            Ok(Self::session())
        }

        fn sign_in(&self, _email: &str, _password: &str) -> ProviderResult<Session> {
            self.sign_ins.set(self.sign_ins.get() + 1);
            if self.reject_sign_in.get() {
                return Err(ProviderError::InvalidCredentials);
            }
            Ok(Self::session())
        }

        fn sign_out(&self, _session: &Session) -> ProviderResult<()> {
            self.sign_outs.set(self.sign_outs.get() + 1);
            Ok(())
        }
    }

    impl DocumentStore for RecordingGateway {
        fn fetch(&self, _session: &Session) -> ProviderResult<UserDocument> {
            Ok(self.document.borrow().clone())
        }

        fn update(&self, _session: &Session, update: DocumentUpdate) -> ProviderResult<()> {
            if self.fail_update.get() {
                return Err(ProviderError::Io(std::io::Error::other("connection reset")));
            }
            self.updates.borrow_mut().push(update.clone());
            update.apply(&mut self.document.borrow_mut());
            Ok(())
        }
    }

    impl FileStorage for RecordingGateway {
        fn upload(&self, _session: &Session, path: &str, _data: &[u8]) -> ProviderResult<FileHandle> {
            if self.fail_upload.get() {
                return Err(ProviderError::Io(std::io::Error::other("quota exceeded")));
            }
            self.uploads.borrow_mut().push(path.to_string());
            Ok(FileHandle::new(path))
        }

        fn public_url(&self, handle: &FileHandle) -> ProviderResult<String> {
            Ok(format!("https://files.example.com/{}", handle.path()))
        }
    }
}
