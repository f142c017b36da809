//! The session of the logged in user, kept on disk between invocations.

use std::{
    fs,
    path::{Path, PathBuf},
};

use devlinks_lib::{Session, fs::state_dir};

use crate::{CliError, CliResult};

const FILE_NAME: &str = "session.toml";

fn path() -> CliResult<PathBuf> {
    Ok(state_dir()?.join(FILE_NAME))
}

pub fn load() -> CliResult<Option<Session>> {
    load_from(&path()?)
}

/// The stored session, or [`CliError::NotLoggedIn`] if there is none.
pub fn require() -> CliResult<Session> {
    load()?.ok_or(CliError::NotLoggedIn)
}

pub fn store(session: &Session) -> CliResult<()> {
    store_to(&path()?, session)
}

pub fn clear() -> CliResult<()> {
    clear_at(&path()?)
}

fn load_from(path: &Path) -> CliResult<Option<Session>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    Ok(Some(toml::from_str(&contents)?))
}

fn store_to(path: &Path, session: &Session) -> CliResult<()> {
    fs::write(path, toml::to_string_pretty(session)?)?;
    Ok(())
}

fn clear_at(path: &Path) -> CliResult<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use devlinks_lib::{Session, gateway::UserId};
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_missing_file_means_logged_out() {
        let dir = tempdir().unwrap();

        assert_eq!(load_from(&dir.path().join(FILE_NAME)).unwrap(), None);
    }

    #[test]
    fn test_clear_forgets_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        let session = Session::new(UserId::from(3), "alex@example.com", "token");

        store_to(&path, &session).unwrap();
        assert_eq!(load_from(&path).unwrap(), Some(session));

        clear_at(&path).unwrap();
        assert_eq!(load_from(&path).unwrap(), None);
        // Clearing twice is fine
        clear_at(&path).unwrap();
    }

    #[test]
    fn test_garbage_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(&path, "user_id = \"not a number\"").unwrap();

        assert!(matches!(load_from(&path), Err(CliError::Session(_))));
    }
}
