use std::{
    fmt::{self, Debug, Formatter},
    fs,
    path::Path,
};

use strum::{Display, EnumIter};
use tracing::{debug, warn};

use crate::{
    Error, Result,
    forms::InFlight,
    gateway::{DocumentStore, DocumentUpdate, FileStorage, Session, UserDocument},
};

/// Folder avatars are uploaded into.
pub const AVATAR_DIR: &str = "profile-images";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum ProfileField {
    #[strum(to_string = "First name")]
    FirstName,
    #[strum(to_string = "Last name")]
    LastName,
    Email,
}

/// An image picked by the user, held in memory until the profile is saved.
#[derive(Clone, PartialEq, Eq)]
pub struct AvatarFile {
    file_name: String,
    bytes: Vec<u8>,
}

impl AvatarFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read an image from disk, naming it after the file.
    pub fn read(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("{} is not a file", path.display()),
                )
            })?;

        Ok(Self::new(file_name, fs::read(path)?))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn storage_path(&self) -> String {
        format!("{AVATAR_DIR}/{}", self.file_name)
    }
}

impl Debug for AvatarFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvatarFile")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Editable profile details.
#[derive(Debug, Default, Clone)]
pub struct ProfileForm {
    first_name: String,
    last_name: String,
    email: String,
    avatar: Option<AvatarFile>,
    in_flight: InFlight,
}

impl ProfileForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// A form pre-filled with the details already stored in `document`.
    pub fn from_document(document: &UserDocument) -> Self {
        Self {
            first_name: document.first_name.clone(),
            last_name: document.last_name.clone(),
            email: document.email.clone(),
            ..Self::default()
        }
    }

    pub fn field(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::FirstName => &self.first_name,
            ProfileField::LastName => &self.last_name,
            ProfileField::Email => &self.email,
        }
    }

    pub fn set_field(&mut self, field: ProfileField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ProfileField::FirstName => self.first_name = value,
            ProfileField::LastName => self.last_name = value,
            ProfileField::Email => self.email = value,
        }
    }

    pub fn avatar(&self) -> Option<&AvatarFile> {
        self.avatar.as_ref()
    }

    pub fn set_avatar(&mut self, avatar: Option<AvatarFile>) {
        debug!(avatar = ?avatar, "Avatar changed");
        self.avatar = avatar;
    }

    pub fn is_complete(&self) -> bool {
        !(self.first_name.is_empty() || self.last_name.is_empty() || self.email.is_empty())
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.is_set()
    }

    /// Whether nothing has been typed, picked or submitted yet.
    pub fn is_pristine(&self) -> bool {
        self.first_name.is_empty()
            && self.last_name.is_empty()
            && self.email.is_empty()
            && self.avatar.is_none()
            && !self.is_saving()
    }

    /// Validate the form and take a snapshot of it for submission, marking the form busy.
    ///
    /// Every successful call must be paired with [`ProfileForm::finish_save`].
    pub fn begin_save(&mut self) -> Result<ProfileSubmission> {
        if self.in_flight.is_set() {
            return Err(Error::SaveInProgress);
        }
        if !self.is_complete() {
            warn!("Rejected profile save: required fields are empty");
            return Err(Error::IncompleteForm);
        }

        self.in_flight.acquire()?;

        Ok(ProfileSubmission {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
        })
    }

    /// Clear the busy mark. Once a save went through the avatar is stored, so it is dropped
    /// from the form.
    pub fn finish_save(&mut self, saved: bool) {
        self.in_flight.release();

        if saved {
            self.avatar = None;
        }
    }

    /// Validate and submit the form in one go, returning the URL of a newly uploaded avatar.
    pub fn save<S>(&mut self, session: &Session, store: &S) -> Result<Option<String>>
    where
        S: DocumentStore + FileStorage + ?Sized,
    {
        let submission = self.begin_save()?;
        let result = submission.submit(session, store);
        self.finish_save(result.is_ok());

        result
    }
}

/// A validated snapshot of a [`ProfileForm`].
#[derive(Debug, Clone)]
pub struct ProfileSubmission {
    first_name: String,
    last_name: String,
    email: String,
    avatar: Option<AvatarFile>,
}

impl ProfileSubmission {
    /// Upload the avatar, if any, then write every field in a single update. If the upload fails
    /// nothing is written.
    ///
    /// Returns the public URL of the uploaded avatar.
    pub fn submit<S>(self, session: &Session, store: &S) -> Result<Option<String>>
    where
        S: DocumentStore + FileStorage + ?Sized,
    {
        let profile_image = match &self.avatar {
            Some(avatar) => {
                let handle = store.upload(session, &avatar.storage_path(), avatar.bytes())?;
                Some(store.public_url(&handle)?)
            }
            None => None,
        };

        store.update(
            session,
            DocumentUpdate {
                first_name: Some(self.first_name),
                last_name: Some(self.last_name),
                email: Some(self.email),
                profile_image: profile_image.clone(),
                links: None,
            },
        )?;
        debug!(user = %session.user_id(), "Saved profile");

        Ok(profile_image)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        Repository,
        gateway::{IdentityProvider, testing::RecordingGateway},
    };

    fn filled() -> ProfileForm {
        let mut form = ProfileForm::new();
        form.set_field(ProfileField::FirstName, "Alex");
        form.set_field(ProfileField::LastName, "Smith");
        form.set_field(ProfileField::Email, "alex@example.com");
        form
    }

    #[test]
    fn test_incomplete_skips_store() {
        let store = RecordingGateway::default();
        let mut form = filled();
        form.set_field(ProfileField::LastName, "");

        let result = form.save(&RecordingGateway::session(), &store);

        assert!(matches!(result, Err(Error::IncompleteForm)));
        assert_eq!(store.update_count(), 0);
        assert!(!form.is_saving());
    }

    #[test]
    fn test_save_without_avatar() {
        let store = RecordingGateway::default();
        let mut form = filled();

        let uploaded = form.save(&RecordingGateway::session(), &store).unwrap();

        assert_eq!(uploaded, None);
        assert!(store.uploads.borrow().is_empty());
        assert_eq!(
            *store.updates.borrow(),
            vec![DocumentUpdate {
                first_name: Some("Alex".into()),
                last_name: Some("Smith".into()),
                email: Some("alex@example.com".into()),
                ..Default::default()
            }]
        );
    }

    #[test]
    fn test_save_with_avatar_is_one_update() {
        let store = RecordingGateway::default();
        let mut form = filled();
        form.set_avatar(Some(AvatarFile::new("me.png", vec![1, 2, 3])));

        form.save(&RecordingGateway::session(), &store).unwrap();

        assert_eq!(
            *store.uploads.borrow(),
            vec!["profile-images/me.png".to_string()]
        );
        assert_eq!(store.update_count(), 1);
        assert_eq!(
            store.document.borrow().profile_image.as_deref(),
            Some("https://files.example.com/profile-images/me.png")
        );
    }

    #[test]
    fn test_saved_avatar_is_not_uploaded_again() {
        let store = RecordingGateway::default();
        let session = RecordingGateway::session();
        let mut form = filled();
        form.set_avatar(Some(AvatarFile::new("me.png", vec![1, 2, 3])));

        let uploaded = form.save(&session, &store).unwrap();
        assert_eq!(
            uploaded.as_deref(),
            Some("https://files.example.com/profile-images/me.png")
        );
        assert!(form.avatar().is_none());

        form.set_field(ProfileField::LastName, "Jones");
        assert_eq!(form.save(&session, &store).unwrap(), None);

        assert_eq!(store.uploads.borrow().len(), 1);
        assert_eq!(store.update_count(), 2);
        // The stored image is left alone by the second save
        assert_eq!(
            store.document.borrow().profile_image.as_deref(),
            Some("https://files.example.com/profile-images/me.png")
        );
    }

    #[test]
    fn test_pristine_until_touched() {
        let mut form = ProfileForm::new();
        assert!(form.is_pristine());

        form.set_field(ProfileField::FirstName, "A");
        assert!(!form.is_pristine());

        let mut form = ProfileForm::new();
        form.set_avatar(Some(AvatarFile::new("me.png", vec![1])));
        assert!(!form.is_pristine());
    }

    #[test]
    fn test_failed_upload_writes_nothing() {
        let store = RecordingGateway::default();
        store.fail_upload.set(true);
        let mut form = filled();
        form.set_avatar(Some(AvatarFile::new("me.png", vec![1, 2, 3])));

        let result = form.save(&RecordingGateway::session(), &store);

        assert!(matches!(result, Err(Error::Provider(_))));
        assert_eq!(store.update_count(), 0);
        assert!(!form.is_saving());
        // The form keeps its state so the user can retry
        assert_eq!(form.field(ProfileField::FirstName), "Alex");
        assert!(form.avatar().is_some());
    }

    #[test]
    fn test_begin_save_while_in_flight() {
        let mut form = filled();

        let _submission = form.begin_save().unwrap();
        assert!(form.is_saving());
        assert!(matches!(form.begin_save(), Err(Error::SaveInProgress)));

        form.finish_save(false);
        assert!(form.begin_save().is_ok());
    }

    #[test]
    fn test_from_document() {
        let document = UserDocument {
            first_name: "Alex".into(),
            last_name: "Smith".into(),
            email: "alex@example.com".into(),
            ..Default::default()
        };

        let form = ProfileForm::from_document(&document);

        assert!(form.is_complete());
        assert_eq!(form.field(ProfileField::Email), "alex@example.com");
        assert!(form.avatar().is_none());
    }

    #[test]
    fn test_save_to_repository() {
        let repo = Repository::mock();
        let session = repo.create_account("alex@example.com", "hunter22").unwrap();
        let mut form = filled();
        form.set_avatar(Some(AvatarFile::new("me.png", vec![0x89, 0x50, 0x4e, 0x47])));

        form.save(&session, &repo).unwrap();

        let document = repo.fetch(&session).unwrap();
        assert_eq!(document.first_name, "Alex");
        assert_eq!(document.last_name, "Smith");
        let url = document.profile_image.unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("profile-images/me.png"));
    }
}
