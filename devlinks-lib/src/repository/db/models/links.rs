use agdb::{DbElement, DbId};

use crate::gateway::Link;

#[derive(Debug, Clone, DbElement, PartialEq)]
pub(crate) struct LinkModel {
    pub(crate) db_id: Option<DbId>,
    /// Display order within the owning document
    pub(crate) position: u64,
    pub(crate) platform: String,
    pub(crate) url: String,
}

impl LinkModel {
    pub fn new(position: u64, link: &Link) -> Self {
        Self {
            db_id: None,
            position,
            platform: link.platform.to_string(),
            url: link.url.clone(),
        }
    }
}
