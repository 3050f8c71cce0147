//! Reddit "thing" identifiers.
//!
//! Things are addressed by fullnames: a type prefix (`t1_`, `t3_`, ...)
//! followed by a base36 id. The store keeps them as plain strings; this
//! module only classifies them.

use serde::Serialize;

/// Longest fullname the `storage` and `update_threads` tables are declared for.
pub const MAX_THING_ID_LEN: usize = 15;

/// Kind of thing encoded in a fullname prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThingKind {
    Comment,
    Account,
    Submission,
    Message,
    Subreddit,
    Award,
}

impl ThingKind {
    /// Classify a fullname such as `t3_3iyxxt`.
    ///
    /// Returns `None` for bare ids and unknown prefixes.
    #[must_use]
    pub fn from_fullname(fullname: &str) -> Option<Self> {
        let (prefix, id) = fullname.split_once('_')?;
        if id.is_empty() {
            return None;
        }
        match prefix {
            "t1" => Some(Self::Comment),
            "t2" => Some(Self::Account),
            "t3" => Some(Self::Submission),
            "t4" => Some(Self::Message),
            "t5" => Some(Self::Subreddit),
            "t6" => Some(Self::Award),
            _ => None,
        }
    }

    /// Fullname prefix without the trailing underscore.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Comment => "t1",
            Self::Account => "t2",
            Self::Submission => "t3",
            Self::Message => "t4",
            Self::Subreddit => "t5",
            Self::Award => "t6",
        }
    }

    /// Build a fullname from a bare id, e.g. `cukvign` -> `t1_cukvign`.
    #[must_use]
    pub fn fullname(self, id: &str) -> String {
        format!("{}_{id}", self.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_prefixes() {
        assert_eq!(
            ThingKind::from_fullname("t1_cukvign"),
            Some(ThingKind::Comment)
        );
        assert_eq!(
            ThingKind::from_fullname("t3_3iyxxt"),
            Some(ThingKind::Submission)
        );
        assert_eq!(
            ThingKind::from_fullname("t2_c384fd"),
            Some(ThingKind::Account)
        );
    }

    #[test]
    fn rejects_bare_and_unknown_ids() {
        assert_eq!(ThingKind::from_fullname("3iyxxt"), None);
        assert_eq!(ThingKind::from_fullname("t9_abc"), None);
        assert_eq!(ThingKind::from_fullname("t1_"), None);
    }

    #[test]
    fn fullname_roundtrips_through_prefix() {
        let name = ThingKind::Submission.fullname("3iyxxt");
        assert_eq!(name, "t3_3iyxxt");
        assert_eq!(ThingKind::from_fullname(&name), Some(ThingKind::Submission));
        assert!(name.len() <= MAX_THING_ID_LEN);
    }
}
