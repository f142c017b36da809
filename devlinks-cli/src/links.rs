use std::str::FromStr;

use clap::Subcommand;
use colored::Colorize;
use devlinks_lib::{
    DocumentStore, Platform, Repository,
    forms::{DraftChange, LinkForm},
};
use strum::IntoEnumIterator;

use crate::{CliError, CliResult, session, success};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List saved links
    List,
    /// Append links, given as PLATFORM URL pairs
    Add {
        #[arg(required = true, num_args = 2.., value_names = ["PLATFORM", "URL"])]
        pairs: Vec<String>,
    },
}

pub fn handle(repo: &Repository, cmd: &Command) -> CliResult<()> {
    let session = session::require()?;

    match cmd {
        Command::List => {
            let links = repo.fetch(&session)?.links;

            if links.is_empty() {
                println!("{}", "No links yet.".dimmed());
            }
            for (n, link) in links.iter().enumerate() {
                println!("{:>2}. {:<10} {}", n + 1, link.platform.to_string().bold(), link.url);
            }
        }
        Command::Add { pairs } => {
            let drafts = parse_pairs(pairs)?;
            let mut form = LinkForm::with_saved(repo.fetch(&session)?.links);

            for (platform, url) in drafts {
                let id = form.add_draft()?;
                form.update_draft(id, DraftChange::Platform(Some(platform)));
                form.update_draft(id, DraftChange::Url(url));
            }

            if let Err(err) = form.save(&session, repo) {
                for (n, draft) in form.drafts().iter().enumerate() {
                    if let Some(message) = draft.error() {
                        eprintln!("  Link #{}: {} ({})", n + 1, message.yellow(), draft.url());
                    }
                }
                return Err(err.into());
            }

            success("Links updated.", "Your links have been updated successfully.");
        }
    }

    Ok(())
}

fn parse_pairs(pairs: &[String]) -> CliResult<Vec<(Platform, String)>> {
    if pairs.len() % 2 != 0 {
        return Err(CliError::Usage(
            "Links must be given as PLATFORM URL pairs".into(),
        ));
    }

    pairs
        .chunks_exact(2)
        .filter_map(|pair| match pair {
            [platform, url] => Some((platform, url)),
            _ => None,
        })
        .map(|(platform, url)| {
            let platform = Platform::from_str(platform).map_err(|_| {
                CliError::Usage(format!(
                    "Unknown platform `{platform}`, expected one of: {}",
                    Platform::iter()
                        .map(|p| p.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })?;
            Ok((platform, url.clone()))
        })
        .collect()
}
