use regex::Regex;
use std::sync::OnceLock;

fn release_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{4}$").expect("static regex"))
}

/// A tag whose name is exactly four ASCII digits, e.g. `0042`.
///
/// Ordering follows the numeric value of the name, which for fixed-width
/// zero-padded names is also the lexical order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReleaseTag {
    number: u16,
    name: String,
}

impl ReleaseTag {
    /// Parse a tag name, returning `None` when it is not a four-digit release tag.
    pub fn parse(name: &str) -> Option<Self> {
        if !release_tag_pattern().is_match(name) {
            return None;
        }
        let number = name.parse::<u16>().ok()?;
        Some(ReleaseTag {
            number,
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number(&self) -> u16 {
        self.number
    }
}

/// Split tag names into four-digit release tags (sorted oldest first) and
/// everything else (in input order).
pub fn partition_release_tags<S: AsRef<str>>(names: &[S]) -> (Vec<ReleaseTag>, Vec<String>) {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();

    for name in names {
        let name = name.as_ref();
        match ReleaseTag::parse(name) {
            Some(tag) => valid.push(tag),
            None => invalid.push(name.to_string()),
        }
    }

    valid.sort();
    (valid, invalid)
}
