use agdb::{DbElement, DbId};
use uuid::Uuid;

#[derive(Debug, Clone, DbElement, PartialEq)]
pub(crate) struct SessionModel {
    pub(crate) db_id: Option<DbId>,
    /// UID of the account that signed in
    pub(crate) uid: u64,
    pub(crate) token: String,
}

impl SessionModel {
    pub fn new(uid: u64) -> Self {
        Self {
            db_id: None,
            uid,
            token: Uuid::new_v4().to_string(),
        }
    }
}
