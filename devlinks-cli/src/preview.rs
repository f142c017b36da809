use colored::Colorize;
use devlinks_lib::{DocumentStore, Repository, UserDocument};

use crate::{CliResult, session};

pub fn handle(repo: &Repository) -> CliResult<()> {
    let session = session::require()?;
    let document = repo.fetch(&session)?;

    print!("{}", card(&document));

    Ok(())
}

/// Render the profile the way visitors would see it.
fn card(document: &UserDocument) -> String {
    let mut out = String::new();

    let name = format!("{} {}", document.first_name, document.last_name);
    let name = name.trim();
    if name.is_empty() {
        out.push_str(&format!("{}\n", "Name".dimmed()));
    } else {
        out.push_str(&format!("{}\n", name.bold()));
    }

    if document.email.is_empty() {
        out.push_str(&format!("{}\n", "Email".dimmed()));
    } else {
        out.push_str(&format!("{}\n", document.email));
    }

    if let Some(url) = &document.profile_image {
        out.push_str(&format!("{}\n", url.dimmed()));
    }

    out.push('\n');
    for link in &document.links {
        out.push_str(&format!(
            "  {:<10} {}\n",
            link.platform.to_string().bold(),
            link.url.cyan()
        ));
    }

    out
}

#[cfg(test)]
mod test {
    use devlinks_lib::{Link, Platform, UserDocument};

    use super::card;

    #[test]
    fn test_card_lists_links_in_order() {
        colored::control::set_override(false);

        let document = UserDocument {
            first_name: "Alex".into(),
            last_name: "Smith".into(),
            email: "alex@example.com".into(),
            profile_image: None,
            links: vec![
                Link::new(Platform::YouTube, "https://www.youtube.com/alex"),
                Link::new(Platform::GitHub, "https://github.com/alex"),
            ],
        };

        let card = card(&document);

        assert!(card.starts_with("Alex Smith\nalex@example.com\n"));
        let youtube = card.find("YouTube").unwrap();
        let github = card.find("GitHub").unwrap();
        assert!(youtube < github);
    }

    #[test]
    fn test_card_placeholders() {
        colored::control::set_override(false);

        let card = card(&UserDocument::default());

        assert!(card.starts_with("Name\nEmail\n"));
    }
}
