use std::sync::Arc;

use agdb::{DbAny, DbAnyTransactionMut, DbValue, QueryBuilder};
use derive_more::Deref;
use parking_lot::RwLock;

use crate::{
    fs::state_dir,
    gateway::{ProviderError, ProviderResult},
    repository::db::models::{CURRENT_MODEL_VERSION, ModelVersion},
};

pub(crate) mod models;

#[derive(Debug, Clone, Deref)]
pub(crate) struct Db {
    #[deref]
    db: Arc<RwLock<DbAny>>,
}

impl Db {
    pub fn new() -> ProviderResult<Self> {
        let path = state_dir()?.join("data.db");
        let path_str = path
            .to_str()
            .ok_or_else(|| ProviderError::InvalidPath(path.display().to_string()))?;

        let db = Self {
            db: Arc::new(RwLock::new(DbAny::new_file(path_str)?)),
        };

        db.init()?;

        Ok(db)
    }

    fn init(&self) -> ProviderResult<()> {
        let alias_count = self
            .db
            .read()
            .exec(QueryBuilder::select().aliases().query())?
            .result;

        if alias_count == 0 {
            self.db
                .write()
                .transaction_mut(|t| -> ProviderResult<()> {
                    t.exec_mut(
                        QueryBuilder::insert()
                            .nodes()
                            .aliases([
                                // Root element nodes
                                "accounts",
                                "documents",
                                "sessions",
                                // State nodes
                                "model_version",
                                "next_uid",
                            ])
                            .query(),
                    )?;

                    // The UID handed to the next account. It gets incremented with every new one.
                    t.exec_mut(
                        QueryBuilder::insert()
                            .values([[("next_uid", 0_u64).into()]])
                            .ids("next_uid")
                            .query(),
                    )?;

                    let model_version_id = t
                        .exec_mut(
                            QueryBuilder::insert()
                                .element(ModelVersion::default())
                                .query(),
                        )?
                        .elements
                        .first()
                        .map(|element| element.id)
                        .ok_or(ProviderError::Corrupted("model version was not inserted"))?;

                    t.exec_mut(
                        QueryBuilder::insert()
                            .edges()
                            .from("model_version")
                            .to(model_version_id)
                            .query(),
                    )?;

                    Ok(())
                })?;
        }

        let versions: Vec<ModelVersion> = self
            .db
            .read()
            .exec(
                QueryBuilder::select()
                    .elements::<ModelVersion>()
                    .search()
                    .from("model_version")
                    .where_()
                    .neighbor()
                    .query(),
            )?
            .try_into()?;

        match versions.first() {
            Some(mv) if mv.version() > CURRENT_MODEL_VERSION => {
                Err(ProviderError::UnsupportedModelVersion(mv.version()))
            }
            Some(_) => Ok(()),
            None => Err(ProviderError::Corrupted("model version is missing")),
        }
    }

    /// Create a memory backed database for use in tests
    #[cfg(test)]
    pub(crate) fn in_memory() -> Self {
        let db = Self {
            db: Arc::new(RwLock::new(
                DbAny::new_memory("test").expect("in-memory database must open"),
            )),
        };

        db.init().expect("in-memory database must initialize");

        db
    }
}

/// Reserve a fresh UID as part of `t`. UIDs are never handed out twice, even after the element
/// that held one is removed.
pub(crate) fn next_uid(t: &mut DbAnyTransactionMut<'_>) -> ProviderResult<u64> {
    let uid = t
        .exec(QueryBuilder::select().ids("next_uid").query())?
        .elements
        .into_iter()
        .flat_map(|element| element.values)
        .find(|kv| kv.key == DbValue::from("next_uid"))
        .ok_or(ProviderError::Corrupted("UID counter is missing"))?
        .value
        .to_u64()?;

    t.exec_mut(
        QueryBuilder::insert()
            .values([[("next_uid", uid + 1).into()]])
            .ids("next_uid")
            .query(),
    )?;

    Ok(uid)
}
