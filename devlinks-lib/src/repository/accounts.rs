use agdb::{DbId, QueryBuilder, QueryId};
use tracing::{debug, info};

use crate::{
    gateway::{IdentityProvider, ProviderError, ProviderResult, Session, UserId},
    repository::{
        Repository,
        account_by_email,
        db::{
            models::{AccountModel, DocumentModel, SessionModel},
            next_uid,
        },
        normalize_email,
    },
};

impl Repository {
    fn open_session(&self, uid: u64, email: &str) -> ProviderResult<Session> {
        let model = SessionModel::new(uid);
        let token = model.token.clone();

        self.db
            .write()
            .transaction_mut(|t| -> ProviderResult<()> {
                let session_id = t
                    .exec_mut(QueryBuilder::insert().element(model).query())?
                    .elements
                    .first()
                    .map(|element| element.id)
                    .ok_or(ProviderError::Corrupted("session was not inserted"))?;

                t.exec_mut(
                    QueryBuilder::insert()
                        .edges()
                        .from("sessions")
                        .to(session_id)
                        .query(),
                )?;

                Ok(())
            })?;

        Ok(Session::new(UserId::from(uid), email, token))
    }
}

impl IdentityProvider for Repository {
    fn create_account(&self, email: &str, password: &str) -> ProviderResult<Session> {
        let min = self.cfg.read().min_password_length();
        if password.chars().count() < min {
            return Err(ProviderError::WeakPassword { min });
        }

        let email = normalize_email(email);

        // The uniqueness check and the inserts share one write lock
        let uid = self
            .db
            .write()
            .transaction_mut(|t| -> ProviderResult<u64> {
                let existing: Vec<AccountModel> = t.exec(account_by_email(&email))?.try_into()?;
                if !existing.is_empty() {
                    return Err(ProviderError::AccountExists);
                }

                let uid = next_uid(t)?;

                let account_id: DbId = t
                    .exec_mut(
                        QueryBuilder::insert()
                            .element(AccountModel::new(uid, &email, password))
                            .query(),
                    )?
                    .elements
                    .first()
                    .map(|element| element.id)
                    .ok_or(ProviderError::Corrupted("account was not inserted"))?;

                t.exec_mut(
                    QueryBuilder::insert()
                        .edges()
                        .from("accounts")
                        .to(account_id)
                        .query(),
                )?;

                let document_id: DbId = t
                    .exec_mut(QueryBuilder::insert().element(DocumentModel::new(uid)).query())?
                    .elements
                    .first()
                    .map(|element| element.id)
                    .ok_or(ProviderError::Corrupted("document was not inserted"))?;

                // Link the document to its owner and the root "documents" node
                t.exec_mut(
                    QueryBuilder::insert()
                        .edges()
                        .from([QueryId::from("documents"), QueryId::from(account_id)])
                        .to(document_id)
                        .query(),
                )?;

                Ok(uid)
            })?;

        info!(uid, "Created account");

        self.open_session(uid, &email)
    }

    fn sign_in(&self, email: &str, password: &str) -> ProviderResult<Session> {
        let email = normalize_email(email);

        match self.find_account(&email)? {
            Some(account) if account.verify(password) => {
                debug!(uid = account.uid, "Credentials accepted");
                self.open_session(account.uid, &email)
            }
            _ => Err(ProviderError::InvalidCredentials),
        }
    }

    fn sign_out(&self, session: &Session) -> ProviderResult<()> {
        // Signing out twice is harmless
        let Some(model) = self.find_session(session.token())? else {
            return Ok(());
        };

        if let Some(db_id) = model.db_id {
            self.db
                .write()
                .exec_mut(QueryBuilder::remove().ids(db_id).query())?;
        }

        debug!(uid = model.uid, "Revoked session");

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::thread;

    use crate::{
        Repository,
        gateway::{DocumentStore, IdentityProvider, ProviderError, UserDocument},
    };

    #[test]
    fn test_create_account() {
        let repo = Repository::mock();

        let session = repo.create_account("alex@example.com", "hunter22").unwrap();

        assert_eq!(session.email(), "alex@example.com");
        // A fresh account starts with an empty document
        assert_eq!(repo.fetch(&session).unwrap(), UserDocument::default());
    }

    #[test]
    fn test_create_duplicate() {
        let repo = Repository::mock();

        repo.create_account("alex@example.com", "hunter22").unwrap();

        assert!(matches!(
            repo.create_account(" Alex@Example.com", "different"),
            Err(ProviderError::AccountExists)
        ));
    }

    #[test]
    fn test_concurrent_signups_with_one_email() {
        for _ in 0..25 {
            let repo = Repository::mock();

            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let repo = repo.clone();
                    thread::spawn(move || repo.create_account("alex@example.com", "hunter22"))
                })
                .collect();
            let results: Vec<_> = handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect();

            assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
            assert!(
                results
                    .iter()
                    .filter_map(|result| result.as_ref().err())
                    .all(|err| matches!(err, ProviderError::AccountExists))
            );
            assert!(repo.sign_in("alex@example.com", "hunter22").is_ok());
        }
    }

    #[test]
    fn test_create_weak_password() {
        let repo = Repository::mock();

        assert!(matches!(
            repo.create_account("alex@example.com", "abc"),
            Err(ProviderError::WeakPassword { min: 6 })
        ));
        // Nothing was stored, so the address is still free
        assert!(repo.create_account("alex@example.com", "hunter22").is_ok());
    }

    #[test]
    fn test_user_ids_are_distinct() {
        let repo = Repository::mock();

        let alex = repo.create_account("alex@example.com", "hunter22").unwrap();
        let sam = repo.create_account("sam@example.com", "hunter22").unwrap();

        assert_ne!(alex.user_id(), sam.user_id());
    }

    #[test]
    fn test_sign_in() {
        let repo = Repository::mock();
        let created = repo.create_account("alex@example.com", "hunter22").unwrap();

        let session = repo.sign_in("ALEX@example.com", "hunter22").unwrap();

        assert_eq!(session.user_id(), created.user_id());
        assert_ne!(session.token(), created.token());
    }

    #[test]
    fn test_sign_in_rejects_bad_credentials() {
        let repo = Repository::mock();
        repo.create_account("alex@example.com", "hunter22").unwrap();

        assert!(matches!(
            repo.sign_in("alex@example.com", "hunter2"),
            Err(ProviderError::InvalidCredentials)
        ));
        assert!(matches!(
            repo.sign_in("nobody@example.com", "hunter22"),
            Err(ProviderError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_sign_out_revokes_session() {
        let repo = Repository::mock();
        let first = repo.create_account("alex@example.com", "hunter22").unwrap();
        let second = repo.sign_in("alex@example.com", "hunter22").unwrap();

        repo.sign_out(&first).unwrap();

        assert!(matches!(
            repo.fetch(&first),
            Err(ProviderError::InvalidSession)
        ));
        // Other sessions of the same account are unaffected
        assert!(repo.fetch(&second).is_ok());
        // Signing out again is not an error
        assert!(repo.sign_out(&first).is_ok());
    }
}
