//! Thin wrappers around an [`IdentityProvider`].
//!
//! Each call is a single attempt. Provider failures are returned unchanged so their message can
//! be shown to the user.

use tracing::{info, warn};

use crate::{
    Result, ValidationError,
    gateway::{IdentityProvider, Session},
};

/// Create an account and sign into it.
///
/// The password confirmation is checked before the provider is contacted.
pub fn register<P>(provider: &P, email: &str, password: &str, confirm_password: &str) -> Result<Session>
where
    P: IdentityProvider + ?Sized,
{
    if password != confirm_password {
        warn!("Rejected registration: password confirmation does not match");
        return Err(ValidationError::PasswordMismatch.into());
    }

    let session = provider.create_account(email, password)?;
    info!(user = %session.user_id(), "Registered account");

    Ok(session)
}

pub fn authenticate<P>(provider: &P, email: &str, password: &str) -> Result<Session>
where
    P: IdentityProvider + ?Sized,
{
    let session = provider.sign_in(email, password)?;
    info!(user = %session.user_id(), "Signed in");

    Ok(session)
}

pub fn end_session<P>(provider: &P, session: &Session) -> Result<()>
where
    P: IdentityProvider + ?Sized,
{
    provider.sign_out(session)?;
    info!(user = %session.user_id(), "Signed out");

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        Error,
        gateway::{ProviderError, testing::RecordingGateway},
    };

    #[test]
    fn test_register_mismatch_skips_provider() {
        let provider = RecordingGateway::default();

        let result = register(&provider, "alex@example.com", "hunter22", "hunter23");

        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::PasswordMismatch))
        ));
        assert!(provider.created_accounts.borrow().is_empty());
    }

    #[test]
    fn test_register() {
        let provider = RecordingGateway::default();

        let session = register(&provider, "alex@example.com", "hunter22", "hunter22").unwrap();

        assert_eq!(session, RecordingGateway::session());
        assert_eq!(
            *provider.created_accounts.borrow(),
            vec!["alex@example.com".to_string()]
        );
    }

    #[test]
    fn test_authenticate_propagates_provider_error() {
        let provider = RecordingGateway::default();
        provider.reject_sign_in.set(true);

        let result = authenticate(&provider, "alex@example.com", "wrong");

        assert!(matches!(
            result,
            Err(Error::Provider(ProviderError::InvalidCredentials))
        ));
        assert_eq!(provider.sign_ins.get(), 1);
    }

    #[test]
    fn test_end_session() {
        let provider = RecordingGateway::default();

        end_session(&provider, &RecordingGateway::session()).unwrap();

        assert_eq!(provider.sign_outs.get(), 1);
    }
}
