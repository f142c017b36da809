use agdb::{DbElement, DbId};
use sha2::{Digest, Sha256};
use uuid::Uuid;

#[derive(Debug, Clone, DbElement, PartialEq)]
pub(crate) struct AccountModel {
    pub(crate) db_id: Option<DbId>,
    pub(crate) uid: u64,
    pub(crate) email: String,
    salt: String,
    /// Hex encoded SHA-256 of the salt followed by the password
    password_digest: String,
}

impl AccountModel {
    pub fn new(uid: u64, email: &str, password: &str) -> Self {
        let salt = Uuid::new_v4().simple().to_string();
        let password_digest = digest(&salt, password);

        Self {
            db_id: None,
            uid,
            email: email.to_string(),
            salt,
            password_digest,
        }
    }

    pub fn verify(&self, password: &str) -> bool {
        digest(&self.salt, password) == self.password_digest
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());

    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod test {
    use super::AccountModel;

    #[test]
    fn test_verify() {
        let account = AccountModel::new(0, "alex@example.com", "hunter22");

        assert!(account.verify("hunter22"));
        assert!(!account.verify("hunter2"));
        assert!(!account.password_digest.contains("hunter22"));
    }

    #[test]
    fn test_salted() {
        let first = AccountModel::new(0, "alex@example.com", "hunter22");
        let second = AccountModel::new(1, "sam@example.com", "hunter22");

        assert_ne!(first.password_digest, second.password_digest);
    }
}
