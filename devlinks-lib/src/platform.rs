//! Supported link platforms and the URL shape each one accepts.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Platform {
    GitHub,
    YouTube,
    Pinterest,
    Twitter,
    LinkedIn,
    Facebook,
}

static PATTERNS: LazyLock<Vec<(Platform, Regex)>> = LazyLock::new(|| {
    Platform::iter()
        .map(|platform| (platform, anchored(platform.url_prefix())))
        .collect()
});

impl Platform {
    /// Everything a profile URL on this platform starts with, up to the account identifier.
    pub fn url_prefix(self) -> &'static str {
        match self {
            Platform::GitHub => "https://github.com/",
            Platform::YouTube => "https://www.youtube.com/",
            Platform::Pinterest => "https://www.pinterest.com/",
            Platform::Twitter => "https://twitter.com/",
            Platform::LinkedIn => "https://www.linkedin.com/in/",
            Platform::Facebook => "https://www.facebook.com/",
        }
    }

    /// Returns `true` if `url` is exactly this platform's prefix followed by an identifier made of
    /// ASCII letters, digits, underscores and hyphens.
    pub fn accepts(self, url: &str) -> bool {
        PATTERNS
            .iter()
            .find(|(platform, _)| *platform == self)
            .is_some_and(|(_, pattern)| pattern.is_match(url))
    }
}

fn anchored(prefix: &str) -> Regex {
    Regex::new(&format!("^{}[A-Za-z0-9_-]+$", regex::escape(prefix)))
        .expect("escaped platform prefixes always form a valid pattern")
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::Platform;

    #[test]
    fn test_accepts_identifier() {
        assert!(Platform::GitHub.accepts("https://github.com/alex-99"));
        assert!(Platform::GitHub.accepts("https://github.com/octocat"));
        assert!(Platform::YouTube.accepts("https://www.youtube.com/some_channel"));
        assert!(Platform::Pinterest.accepts("https://www.pinterest.com/pins"));
        assert!(Platform::Twitter.accepts("https://twitter.com/jack"));
        assert!(Platform::LinkedIn.accepts("https://www.linkedin.com/in/alex-smith"));
        assert!(Platform::Facebook.accepts("https://www.facebook.com/zuck"));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(!Platform::GitHub.accepts("https://github.com/alex 99"));
        assert!(!Platform::GitHub.accepts("http://github.com/alex"));
        assert!(!Platform::GitHub.accepts("https://github.com/"));
        assert!(!Platform::GitHub.accepts("https://github.com/alex/repo"));
        assert!(!Platform::GitHub.accepts("xhttps://github.com/alex"));
        assert!(!Platform::GitHub.accepts("https://githubXcom/alex"));
        assert!(!Platform::Twitter.accepts("https://x.com/jack"));
        assert!(!Platform::LinkedIn.accepts("https://www.linkedin.com/alex"));
        assert!(!Platform::YouTube.accepts("https://youtube.com/channel"));
    }

    #[test]
    fn test_rejects_non_ascii_identifier() {
        assert!(!Platform::Facebook.accepts("https://www.facebook.com/josé"));
    }

    #[test]
    fn test_prefix_alone_belongs_to_one_platform() {
        for platform in Platform::iter() {
            let url = format!("{}someone", platform.url_prefix());
            let accepting: Vec<Platform> = Platform::iter().filter(|p| p.accepts(&url)).collect();

            assert_eq!(accepting, vec![platform]);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(Platform::from_str("GitHub").unwrap(), Platform::GitHub);
        assert_eq!(Platform::from_str("linkedin").unwrap(), Platform::LinkedIn);
        assert_eq!(Platform::YouTube.to_string(), "YouTube");
        assert!(Platform::from_str("Mastodon").is_err());
    }
}
