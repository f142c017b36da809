use agdb::{DbElement, DbId};

use crate::gateway::DocumentUpdate;

#[derive(Debug, Clone, DbElement, PartialEq)]
pub(crate) struct DocumentModel {
    pub(crate) db_id: Option<DbId>,
    /// UID of the owning account
    pub(crate) uid: u64,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    /// Empty until an avatar is uploaded
    pub(crate) profile_image: String,
}

impl DocumentModel {
    pub fn new(uid: u64) -> Self {
        Self {
            db_id: None,
            uid,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            profile_image: String::new(),
        }
    }

    /// Merge the scalar fields of `update`. Links are stored separately.
    pub fn merge(&mut self, update: &DocumentUpdate) {
        if let Some(first_name) = &update.first_name {
            self.first_name.clone_from(first_name);
        }
        if let Some(last_name) = &update.last_name {
            self.last_name.clone_from(last_name);
        }
        if let Some(email) = &update.email {
            self.email.clone_from(email);
        }
        if let Some(profile_image) = &update.profile_image {
            self.profile_image.clone_from(profile_image);
        }
    }
}
