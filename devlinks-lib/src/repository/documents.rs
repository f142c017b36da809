use agdb::QueryBuilder;
use tracing::{debug, warn};

use crate::{
    gateway::{
        DocumentStore, DocumentUpdate, Link, ProviderError, ProviderResult, Session, UserDocument,
    },
    platform::Platform,
    repository::{Repository, db::models::LinkModel, document_by_uid, owned_document},
};

impl DocumentStore for Repository {
    fn fetch(&self, session: &Session) -> ProviderResult<UserDocument> {
        let uid = self.authorize(session)?;
        let (document_id, document) = self.document(uid)?;

        let links = self
            .links(document_id)?
            .into_iter()
            .filter_map(|model| match model.platform.parse::<Platform>() {
                Ok(platform) => Some(Link::new(platform, model.url)),
                Err(_) => {
                    warn!(uid, platform = model.platform, "Skipping link with unknown platform");
                    None
                }
            })
            .collect();

        Ok(UserDocument {
            first_name: document.first_name,
            last_name: document.last_name,
            email: document.email,
            profile_image: (!document.profile_image.is_empty()).then_some(document.profile_image),
            links,
        })
    }

    fn update(&self, session: &Session, update: DocumentUpdate) -> ProviderResult<()> {
        let uid = self.authorize(session)?;

        // Read, merge and write happen under one write lock
        self.db
            .write()
            .transaction_mut(|t| -> ProviderResult<()> {
                let (document_id, mut document) =
                    owned_document(t.exec(document_by_uid(uid))?.try_into()?)?;

                if update.has_details() {
                    document.merge(&update);
                    // The document carries its id, so this overwrites it in place
                    t.exec_mut(QueryBuilder::insert().element(document).query())?;
                }

                let Some(links) = &update.links else {
                    return Ok(());
                };

                let stale: Vec<LinkModel> = t
                    .exec(
                        QueryBuilder::select()
                            .elements::<LinkModel>()
                            .search()
                            .from(document_id)
                            .query(),
                    )?
                    .try_into()?;

                for db_id in stale.iter().filter_map(|link| link.db_id) {
                    t.exec_mut(QueryBuilder::remove().ids(db_id).query())?;
                }

                for (position, link) in (0_u64..).zip(links) {
                    let link_id = t
                        .exec_mut(
                            QueryBuilder::insert()
                                .element(LinkModel::new(position, link))
                                .query(),
                        )?
                        .elements
                        .first()
                        .map(|element| element.id)
                        .ok_or(ProviderError::Corrupted("link was not inserted"))?;

                    t.exec_mut(
                        QueryBuilder::insert()
                            .edges()
                            .from(document_id)
                            .to(link_id)
                            .query(),
                    )?;
                }

                Ok(())
            })?;

        debug!(uid, "Updated document");

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::thread;

    use crate::{
        Repository,
        gateway::{DocumentStore, DocumentUpdate, IdentityProvider, Link, ProviderError, Session},
        platform::Platform,
    };

    fn signed_in() -> (Repository, Session) {
        let repo = Repository::mock();
        let session = repo.create_account("alex@example.com", "hunter22").unwrap();
        (repo, session)
    }

    #[test]
    fn test_update_merges_fields() {
        let (repo, session) = signed_in();

        repo.update(
            &session,
            DocumentUpdate {
                first_name: Some("Alex".into()),
                last_name: Some("Smith".into()),
                ..Default::default()
            },
        )
        .unwrap();
        repo.update(
            &session,
            DocumentUpdate {
                last_name: Some("Jones".into()),
                ..Default::default()
            },
        )
        .unwrap();

        let document = repo.fetch(&session).unwrap();
        assert_eq!(document.first_name, "Alex");
        assert_eq!(document.last_name, "Jones");
        assert_eq!(document.profile_image, None);
    }

    #[test]
    fn test_links_keep_order_and_get_replaced() {
        let (repo, session) = signed_in();
        let links = vec![
            Link::new(Platform::YouTube, "https://www.youtube.com/@alex"),
            Link::new(Platform::GitHub, "https://github.com/alex"),
            Link::new(Platform::Twitter, "https://twitter.com/alex"),
        ];

        repo.update(
            &session,
            DocumentUpdate {
                links: Some(links.clone()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(repo.fetch(&session).unwrap().links, links);

        let replacement = vec![Link::new(Platform::LinkedIn, "https://linkedin.com/in/alex")];
        repo.update(
            &session,
            DocumentUpdate {
                links: Some(replacement.clone()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(repo.fetch(&session).unwrap().links, replacement);
    }

    #[test]
    fn test_scalar_update_keeps_links() {
        let (repo, session) = signed_in();
        let links = vec![Link::new(Platform::GitHub, "https://github.com/alex")];
        repo.update(
            &session,
            DocumentUpdate {
                links: Some(links.clone()),
                ..Default::default()
            },
        )
        .unwrap();

        repo.update(
            &session,
            DocumentUpdate {
                email: Some("public@example.com".into()),
                ..Default::default()
            },
        )
        .unwrap();

        let document = repo.fetch(&session).unwrap();
        assert_eq!(document.email, "public@example.com");
        assert_eq!(document.links, links);
    }

    #[test]
    fn test_concurrent_links_and_details_updates() {
        let (repo, session) = signed_in();
        let links = vec![Link::new(Platform::GitHub, "https://github.com/alex")];

        for round in 0..100 {
            let first_name = format!("name-{round}");

            let links_update = {
                let (repo, session, links) = (repo.clone(), session.clone(), links.clone());
                thread::spawn(move || {
                    repo.update(
                        &session,
                        DocumentUpdate {
                            links: Some(links),
                            ..Default::default()
                        },
                    )
                })
            };
            let details_update = {
                let (repo, session, first_name) =
                    (repo.clone(), session.clone(), first_name.clone());
                thread::spawn(move || {
                    repo.update(
                        &session,
                        DocumentUpdate {
                            first_name: Some(first_name),
                            ..Default::default()
                        },
                    )
                })
            };
            links_update.join().unwrap().unwrap();
            details_update.join().unwrap().unwrap();

            let document = repo.fetch(&session).unwrap();
            assert_eq!(document.first_name, first_name);
            assert_eq!(document.links, links);
        }
    }

    #[test]
    fn test_documents_are_per_user() {
        let (repo, alex) = signed_in();
        let sam = repo.create_account("sam@example.com", "hunter22").unwrap();

        repo.update(
            &alex,
            DocumentUpdate {
                first_name: Some("Alex".into()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(repo.fetch(&sam).unwrap().first_name, "");
    }

    #[test]
    fn test_forged_session_is_rejected() {
        let (repo, session) = signed_in();
        let forged = Session::new(session.user_id(), session.email(), "not-a-token");

        assert!(matches!(
            repo.fetch(&forged),
            Err(ProviderError::InvalidSession)
        ));
        assert!(matches!(
            repo.update(&forged, DocumentUpdate::default()),
            Err(ProviderError::InvalidSession)
        ));
    }
}
