use colored::Colorize;
use devlinks_lib::{
    Repository, auth,
    forms::{LoginForm, SignupForm},
    gateway::ProviderError,
};
use tracing::debug;

use crate::{CliResult, session, success};

pub fn signup(
    repo: &Repository,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> CliResult<()> {
    let form = SignupForm {
        email: email.to_string(),
        password: password.to_string(),
        confirm_password: confirm_password.to_string(),
    };

    let session = form.submit(repo)?;
    session::store(&session)?;

    success("Signed up.", &format!("Logged in as {}", session.email().bold()));

    Ok(())
}

pub fn login(repo: &Repository, email: &str, password: &str) -> CliResult<()> {
    let form = LoginForm {
        email: email.to_string(),
        password: password.to_string(),
    };

    let session = form.submit(repo)?;
    session::store(&session)?;

    success("Logged in.", &format!("Welcome back, {}", session.email().bold()));

    Ok(())
}

pub fn logout(repo: &Repository) -> CliResult<()> {
    let Some(session) = session::load()? else {
        println!("Not logged in.");
        return Ok(());
    };

    match auth::end_session(repo, &session) {
        Ok(()) => {}
        // Already revoked, the local copy just needs to go
        Err(devlinks_lib::Error::Provider(ProviderError::InvalidSession)) => {
            debug!("Stored session was already invalid");
        }
        Err(err) => return Err(err.into()),
    }
    session::clear()?;

    success("Logged out.", "");

    Ok(())
}
