use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use tracing::debug;

use crate::{
    gateway::{FileHandle, FileStorage, ProviderError, ProviderResult, Session},
    repository::Repository,
};

impl FileStorage for Repository {
    fn upload(&self, session: &Session, path: &str, data: &[u8]) -> ProviderResult<FileHandle> {
        let uid = self.authorize(session)?;

        // Every user gets their own folder inside the storage directory
        let relative = PathBuf::from(uid.to_string()).join(checked_relative(path)?);
        let destination = self.cfg.read().storage_dir()?.join(&relative);

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&destination, data)?;

        debug!(uid, path = %destination.display(), bytes = data.len(), "Stored upload");

        Ok(FileHandle::new(relative.to_string_lossy()))
    }

    fn public_url(&self, handle: &FileHandle) -> ProviderResult<String> {
        let path = self
            .cfg
            .read()
            .storage_dir()?
            .join(checked_relative(handle.path())?);

        if !path.is_file() {
            return Err(ProviderError::NotFound);
        }

        Ok(format!("file://{}", path.display()))
    }
}

/// Only plain relative paths may be used to address stored files.
fn checked_relative(path: &str) -> ProviderResult<&Path> {
    let relative = Path::new(path);

    if path.is_empty()
        || !relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
    {
        return Err(ProviderError::InvalidPath(path.to_string()));
    }

    Ok(relative)
}

#[cfg(test)]
mod test {
    use std::fs;

    use crate::{
        Repository,
        gateway::{FileHandle, FileStorage, IdentityProvider, ProviderError},
    };

    #[test]
    fn test_upload_and_resolve() {
        let repo = Repository::mock();
        let session = repo.create_account("alex@example.com", "hunter22").unwrap();

        let handle = repo
            .upload(&session, "profile-images/avatar.png", b"png bytes")
            .unwrap();
        let url = repo.public_url(&handle).unwrap();

        let stored = url.strip_prefix("file://").unwrap();
        assert!(stored.ends_with("avatar.png"));
        assert_eq!(fs::read(stored).unwrap(), b"png bytes");
    }

    #[test]
    fn test_upload_replaces_existing_file() {
        let repo = Repository::mock();
        let session = repo.create_account("alex@example.com", "hunter22").unwrap();

        repo.upload(&session, "profile-images/avatar.png", b"old").unwrap();
        let handle = repo
            .upload(&session, "profile-images/avatar.png", b"new")
            .unwrap();

        let url = repo.public_url(&handle).unwrap();
        assert_eq!(fs::read(url.strip_prefix("file://").unwrap()).unwrap(), b"new");
    }

    #[test]
    fn test_escaping_paths_are_rejected() {
        let repo = Repository::mock();
        let session = repo.create_account("alex@example.com", "hunter22").unwrap();

        for path in ["", "../secrets", "/etc/passwd", "profile-images/../../x"] {
            assert!(
                matches!(
                    repo.upload(&session, path, b"data"),
                    Err(ProviderError::InvalidPath(_))
                ),
                "{path:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_unknown_handle() {
        let repo = Repository::mock();

        assert!(matches!(
            repo.public_url(&FileHandle::new("0/missing.png")),
            Err(ProviderError::NotFound)
        ));
    }
}
