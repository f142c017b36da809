use std::sync::Arc;

use agdb::{Comparison, DbId, QueryBuilder, SelectValuesQuery};
use parking_lot::RwLock;

use crate::{
    Result,
    gateway::{ProviderError, ProviderResult, Session},
    repository::{
        config::{Cfg, CoreConfig},
        db::{
            Db,
            models::{AccountModel, DocumentModel, LinkModel, SessionModel},
        },
    },
};

mod accounts;
mod db;
mod documents;
mod files;

pub mod config;

/// Central access point for all persistent data.
///
/// The [`Repository`] stands in for the remote services devlinks talks to: it implements
/// [`IdentityProvider`](crate::IdentityProvider), [`DocumentStore`](crate::DocumentStore) and
/// [`FileStorage`](crate::FileStorage) on top of an embedded database and a storage directory.
/// Cloning is cheap and every clone shares the same database.
#[derive(Clone, Debug)]
pub struct Repository {
    db: Db,
    cfg: Cfg,
}

impl Repository {
    pub fn new() -> Result<Self> {
        Ok(Self {
            db: Db::new()?,
            cfg: Arc::new(RwLock::new(CoreConfig::load()?)),
        })
    }

    /// Look up an account by its (normalized) email address.
    fn find_account(&self, email: &str) -> ProviderResult<Option<AccountModel>> {
        let accounts: Vec<AccountModel> =
            self.db.read().exec(account_by_email(email))?.try_into()?;

        Ok(accounts.into_iter().next())
    }

    fn find_session(&self, token: &str) -> ProviderResult<Option<SessionModel>> {
        let sessions: Vec<SessionModel> = self
            .db
            .read()
            .exec(
                QueryBuilder::select()
                    .elements::<SessionModel>()
                    .search()
                    .from("sessions")
                    .where_()
                    .key("token")
                    .value(Comparison::Equal(token.into()))
                    .query(),
            )?
            .try_into()?;

        Ok(sessions.into_iter().next())
    }

    /// Check that `session` is still live, returning the UID of its account.
    fn authorize(&self, session: &Session) -> ProviderResult<u64> {
        match self.find_session(session.token())? {
            Some(model) if model.uid == session.user_id().as_u64() => Ok(model.uid),
            _ => Err(ProviderError::InvalidSession),
        }
    }

    fn document(&self, uid: u64) -> ProviderResult<(DbId, DocumentModel)> {
        owned_document(self.db.read().exec(document_by_uid(uid))?.try_into()?)
    }

    /// The links of a document, in display order.
    fn links(&self, document_id: DbId) -> ProviderResult<Vec<LinkModel>> {
        let mut links: Vec<LinkModel> = self
            .db
            .read()
            .exec(
                QueryBuilder::select()
                    .elements::<LinkModel>()
                    .search()
                    .from(document_id)
                    .query(),
            )?
            .try_into()?;

        links.sort_by_key(|link| link.position);

        Ok(links)
    }

    #[cfg(test)]
    /// Return a mock version of a [`Repository`] with an in-memory database and a temporary
    /// storage directory.
    pub(crate) fn mock() -> Self {
        Self {
            db: Db::in_memory(),
            cfg: Arc::new(RwLock::new(CoreConfig::mock())),
        }
    }
}

fn account_by_email(email: &str) -> SelectValuesQuery {
    QueryBuilder::select()
        .elements::<AccountModel>()
        .search()
        .from("accounts")
        .where_()
        .key("email")
        .value(Comparison::Equal(email.into()))
        .query()
}

fn document_by_uid(uid: u64) -> SelectValuesQuery {
    QueryBuilder::select()
        .elements::<DocumentModel>()
        .search()
        .from("documents")
        .where_()
        .key("uid")
        .value(Comparison::Equal(uid.into()))
        .query()
}

/// The single document a UID owns, along with its id.
fn owned_document(documents: Vec<DocumentModel>) -> ProviderResult<(DbId, DocumentModel)> {
    let document = documents
        .into_iter()
        .next()
        .ok_or(ProviderError::NotFound)?;
    let db_id = document
        .db_id
        .ok_or(ProviderError::Corrupted("document was loaded without an id"))?;

    Ok((db_id, document))
}

/// Emails are matched case-insensitively and without surrounding whitespace.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
