//! User and subreddit bans.
//!
//! A ban row either names a module or carries no module at all, in which
//! case it applies to every module.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Which ban table an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BanTarget {
    /// `userbans`, keyed by username.
    User,
    /// `subbans`, keyed by subreddit name.
    Subreddit,
}

impl BanTarget {
    /// Reddit path prefix, `u` or `r`.
    #[must_use]
    pub const fn path_prefix(self) -> &'static str {
        match self {
            Self::User => "u",
            Self::Subreddit => "r",
        }
    }
}

impl fmt::Display for BanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Subreddit => f.write_str("subreddit"),
        }
    }
}

/// Reach of a ban.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BanScope {
    /// Only the named module ignores the target.
    Module(String),
    /// Every module ignores the target.
    Global,
}

impl BanScope {
    #[must_use]
    pub fn module(name: impl Into<String>) -> Self {
        Self::Module(name.into())
    }
}

/// A stored ban.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ban {
    pub target: BanTarget,
    /// Username or subreddit name.
    pub name: String,
    /// Module the ban applies to; `None` for a global ban or a dangling module id.
    pub module: Option<String>,
    pub global: bool,
}

/// Compiled `ban /u/name` pattern.
fn ban_pattern() -> &'static Regex {
    static RE_BAN: OnceLock<Regex> = OnceLock::new();
    RE_BAN.get_or_init(|| Regex::new(r"(?i)ban /([ru])/([\w-]+)").expect("ban pattern is valid"))
}

/// A ban asked for through an inbox message: `ban /u/name` or `ban /r/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanRequest {
    pub target: BanTarget,
    pub name: String,
}

impl BanRequest {
    /// Extract a ban request from a message body.
    ///
    /// Only the first request in the body is considered.
    #[must_use]
    pub fn parse(body: &str) -> Option<Self> {
        let caps = ban_pattern().captures(body)?;
        let target = match caps.get(1)?.as_str() {
            "u" | "U" => BanTarget::User,
            _ => BanTarget::Subreddit,
        };
        Some(Self {
            target,
            name: caps.get(2)?.as_str().to_string(),
        })
    }

    /// Whether `sender` may issue this request: users can only ban
    /// themselves and subreddits only themselves.
    #[must_use]
    pub fn is_self_request(&self, sender: &str, sender_target: BanTarget) -> bool {
        self.target == sender_target && self.name.eq_ignore_ascii_case(sender)
    }
}

/// Extract a ban request from an inbox message body.
#[must_use]
pub fn parse_ban_request(body: &str) -> Option<BanRequest> {
    BanRequest::parse(body)
}
