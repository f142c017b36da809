use std::path::PathBuf;

use clap::Subcommand;
use colored::Colorize;
use devlinks_lib::{
    DocumentStore, Repository,
    forms::{AvatarFile, ProfileField, ProfileForm},
};

use crate::{CliResult, session, success};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the stored profile details
    Show,
    /// Change profile details. Fields that aren't given keep their current value.
    Set {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Image to upload as the profile picture
        #[arg(long)]
        avatar: Option<PathBuf>,
    },
}

pub fn handle(repo: &Repository, cmd: &Command) -> CliResult<()> {
    let session = session::require()?;

    match cmd {
        Command::Show => {
            let document = repo.fetch(&session)?;
            let form = ProfileForm::from_document(&document);

            for field in [
                ProfileField::FirstName,
                ProfileField::LastName,
                ProfileField::Email,
            ] {
                let value = form.field(field);
                if value.is_empty() {
                    println!("{:>12}: {}", field, "(not set)".dimmed());
                } else {
                    println!("{:>12}: {}", field, value);
                }
            }
            match &document.profile_image {
                Some(url) => println!("{:>12}: {}", "Avatar", url),
                None => println!("{:>12}: {}", "Avatar", "(not set)".dimmed()),
            }
        }
        Command::Set {
            first_name,
            last_name,
            email,
            avatar,
        } => {
            let mut form = ProfileForm::from_document(&repo.fetch(&session)?);

            for (field, value) in [
                (ProfileField::FirstName, first_name),
                (ProfileField::LastName, last_name),
                (ProfileField::Email, email),
            ] {
                if let Some(value) = value {
                    form.set_field(field, value.as_str());
                }
            }
            if let Some(path) = avatar {
                form.set_avatar(Some(AvatarFile::read(path)?));
            }

            form.save(&session, repo)?;

            success(
                "Profile updated.",
                "Your profile has been updated successfully.",
            );
        }
    }

    Ok(())
}
