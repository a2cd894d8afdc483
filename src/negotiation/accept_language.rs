//! `Accept-Language` header parsing.
//!
//! # Responsibilities
//! - Extract (tag, weight) tokens from the raw header text
//! - Apply default weight 1 when no q-factor is given
//! - Rank tokens by weight, highest first
//!
//! # Design Decisions
//! - Tokens are found by scanning, not by splitting on commas: anything the
//!   token pattern does not match is skipped silently
//! - Only `1` and `0.<digits>` are accepted as q-factors. By default any
//!   other factor leaves the tag at the default weight;
//!   [`InvalidWeight::Drop`] discards such a token instead
//! - Weights are `f64` so ranking compares at double precision
//! - A repeated tag keeps its first position and its last weight
//! - Ranking is a stable sort, so equal weights keep header order

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Weight assigned to a tag without an explicit q-factor.
pub const DEFAULT_WEIGHT: f64 = 1.0;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i-u)([a-z]{1,8}(-[a-z]{1,8})?)\s*(;\s*q\s*=\s*(1|0\.[0-9]+))?")
        .expect("language token pattern is valid")
});

// Same tag pattern, but the factor runs to the next comma so a bad one can
// be recognized and rejected as a whole. The factor class stays Unicode-aware
// so it never splits a multi-byte character.
static TOKEN_WITH_RAW_FACTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i-u)([a-z]{1,8}(-[a-z]{1,8})?)\s*(;\s*q\s*=((?u:[^,])*))?")
        .expect("raw factor token pattern is valid")
});

static FACTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(1|0\.[0-9]+)$").expect("factor pattern is valid"));

/// What to do with a tag whose q-factor is not `1` or `0.<digits>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidWeight {
    /// Keep the tag at [`DEFAULT_WEIGHT`] and rescan after it.
    #[default]
    Ignore,
    /// Discard the tag together with its factor.
    Drop,
}

/// A single language preference taken from the header.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguagePreference {
    /// Tag exactly as the client sent it (e.g. "fr-CA").
    pub tag: String,
    /// Preference strength in [0, 1].
    pub weight: f64,
}

impl LanguagePreference {
    pub fn new(tag: impl Into<String>, weight: f64) -> Self {
        Self {
            tag: tag.into(),
            weight,
        }
    }

    /// Site map lookup key: first two characters of the tag, lower-cased.
    pub fn code(&self) -> String {
        self.tag
            .trim_end()
            .chars()
            .take(2)
            .collect::<String>()
            .to_lowercase()
    }
}

/// Parse a raw header into preferences ranked by descending weight.
///
/// Never fails. Text that contains no recognizable token gives an empty list.
pub fn parse_accept_language(header: &str) -> Vec<LanguagePreference> {
    parse_accept_language_with(header, InvalidWeight::Ignore)
}

/// [`parse_accept_language`] with an explicit policy for bad q-factors.
pub fn parse_accept_language_with(header: &str, policy: InvalidWeight) -> Vec<LanguagePreference> {
    let mut ranking = Ranking::default();

    match policy {
        InvalidWeight::Ignore => {
            for caps in TOKEN.captures_iter(header) {
                let Some(tag) = caps.get(1) else {
                    continue;
                };
                let weight = caps
                    .get(4)
                    .and_then(|q| q.as_str().parse::<f64>().ok())
                    .unwrap_or(DEFAULT_WEIGHT);
                ranking.insert(tag.as_str(), weight);
            }
        }
        InvalidWeight::Drop => {
            for caps in TOKEN_WITH_RAW_FACTOR.captures_iter(header) {
                let Some(tag) = caps.get(1) else {
                    continue;
                };
                match caps.get(4).map(|q| q.as_str().trim()) {
                    None => ranking.insert(tag.as_str(), DEFAULT_WEIGHT),
                    Some(factor) if FACTOR.is_match(factor) => {
                        if let Ok(weight) = factor.parse::<f64>() {
                            ranking.insert(tag.as_str(), weight);
                        }
                    }
                    Some(factor) => {
                        tracing::trace!(tag = tag.as_str(), factor, "Dropping tag with invalid q-factor");
                    }
                }
            }
        }
    }

    ranking.into_ranked()
}

/// Preferences in first-seen order, deduplicated by exact tag.
#[derive(Default)]
struct Ranking {
    preferences: Vec<LanguagePreference>,
    positions: HashMap<String, usize>,
}

impl Ranking {
    fn insert(&mut self, tag: &str, weight: f64) {
        match self.positions.get(tag) {
            Some(&index) => self.preferences[index].weight = weight,
            None => {
                self.positions.insert(tag.to_string(), self.preferences.len());
                self.preferences.push(LanguagePreference::new(tag, weight));
            }
        }
    }

    fn into_ranked(mut self) -> Vec<LanguagePreference> {
        self.preferences.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        self.preferences
    }
}
