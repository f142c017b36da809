use agdb::{DbElement, DbId};

mod accounts;
mod documents;
mod links;
mod sessions;

pub(crate) use accounts::AccountModel;
pub(crate) use documents::DocumentModel;
pub(crate) use links::LinkModel;
pub(crate) use sessions::SessionModel;

pub(crate) const CURRENT_MODEL_VERSION: u64 = 1;

/// Version of the element layout a database was written with.
#[derive(Debug, Clone, DbElement, PartialEq)]
pub(crate) struct ModelVersion {
    db_id: Option<DbId>,
    version: u64,
}

impl ModelVersion {
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl Default for ModelVersion {
    fn default() -> Self {
        Self {
            db_id: None,
            version: CURRENT_MODEL_VERSION,
        }
    }
}
