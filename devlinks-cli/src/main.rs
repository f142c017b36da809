use clap::{Parser, Subcommand};
use colored::Colorize;
use devlinks_lib::{Repository, gateway::ProviderError};
use sysexits::ExitCode;
use thiserror::Error;
use tracing::warn;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod account;
mod links;
mod preview;
mod profile;
mod session;

#[derive(Parser, Debug)]
#[command(name = "devlinks")]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Create an account and log into it
    Signup {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        #[arg(short, long)]
        confirm_password: String,
    },
    /// Log into an existing account
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Log out and forget the stored session
    Logout,
    /// Operate on profile details
    #[command(subcommand)]
    Profile(profile::Command),
    /// Operate on links
    #[command(subcommand)]
    Links(links::Command),
    /// Print the profile card
    Preview,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("You are not logged in. Run `devlinks login` first.")]
    NotLoggedIn,
    #[error("{0}")]
    Usage(String),
    #[error("Failed to read the stored session: {0}")]
    Session(#[from] toml::de::Error),
    #[error("Failed to store the session: {0}")]
    SessionWrite(#[from] toml::ser::Error),
    #[error(transparent)]
    Lib(#[from] devlinks_lib::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ProviderError> for CliError {
    fn from(err: ProviderError) -> Self {
        Self::Lib(err.into())
    }
}

impl CliError {
    fn exit_code(&self) -> ExitCode {
        use devlinks_lib::Error;

        match self {
            CliError::NotLoggedIn => ExitCode::NoPerm,
            CliError::Usage(_) => ExitCode::Usage,
            CliError::Session(_) | CliError::SessionWrite(_) | CliError::Io(_) => ExitCode::IoErr,
            CliError::Lib(err) => match err {
                Error::Validation(_) | Error::IncompleteForm | Error::CapacityExceeded(_) => {
                    ExitCode::DataErr
                }
                Error::SaveInProgress => ExitCode::TempFail,
                Error::Config(_) => ExitCode::Config,
                Error::Io(_) => ExitCode::IoErr,
                Error::Provider(err) => match err {
                    ProviderError::AccountExists
                    | ProviderError::InvalidCredentials
                    | ProviderError::InvalidSession => ExitCode::NoUser,
                    ProviderError::WeakPassword { .. } | ProviderError::InvalidPath(_) => {
                        ExitCode::DataErr
                    }
                    ProviderError::NotFound => ExitCode::NoInput,
                    ProviderError::Database(_) | ProviderError::Io(_) => ExitCode::IoErr,
                    _ => ExitCode::Software,
                },
            },
        }
    }

    fn is_expired_session(&self) -> bool {
        matches!(
            self,
            CliError::Lib(devlinks_lib::Error::Provider(ProviderError::InvalidSession))
        )
    }
}

pub type CliResult<T> = Result<T, CliError>;

/// Print a titled confirmation, mirroring the notifications of the graphical editor.
pub fn success(title: &str, description: &str) {
    println!("{} {}", title.green().bold(), description);
}

fn run(repo: &Repository, command: &Command) -> CliResult<()> {
    match command {
        Command::Signup {
            email,
            password,
            confirm_password,
        } => account::signup(repo, email, password, confirm_password),
        Command::Login { email, password } => account::login(repo, email, password),
        Command::Logout => account::logout(repo),
        Command::Profile(cmd) => profile::handle(repo, cmd),
        Command::Links(cmd) => links::handle(repo, cmd),
        Command::Preview => preview::handle(repo),
    }
}

fn main() -> ExitCode {
    // Human friendly panicking in release mode
    human_panic::setup_panic!();

    // Logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set up logging: {err}");
    }

    let cli = Cli::parse();

    let result = Repository::new()
        .map_err(CliError::from)
        .and_then(|repo| run(&repo, &cli.command));

    match result {
        Ok(()) => ExitCode::Ok,
        Err(err) => {
            if err.is_expired_session() {
                // The stored token is useless now, so don't keep offering it
                if let Err(clear_err) = session::clear() {
                    warn!(%clear_err, "Failed to remove expired session");
                }
            }
            eprintln!("{} {err}", "error:".red().bold());
            err.exit_code()
        }
    }
}
