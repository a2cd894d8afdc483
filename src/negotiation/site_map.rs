//! Language code to landing page mapping.

use std::collections::BTreeMap;

use thiserror::Error;

/// Code whose entry is used when no preference matches.
pub const FALLBACK_LANGUAGE: &str = "en";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SiteMapError {
    #[error("site map has no entry for fallback language \"{0}\"")]
    MissingFallback(&'static str),
}

/// Supported languages and their landing pages.
///
/// Always contains [`FALLBACK_LANGUAGE`]; [`SiteMap::new`] refuses a map
/// without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteMap {
    sites: BTreeMap<String, String>,
}

impl SiteMap {
    pub fn new<I, K, V>(entries: I) -> Result<Self, SiteMapError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let sites: BTreeMap<String, String> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        if !sites.contains_key(FALLBACK_LANGUAGE) {
            return Err(SiteMapError::MissingFallback(FALLBACK_LANGUAGE));
        }

        Ok(Self { sites })
    }

    /// Landing page for an exact language code.
    pub fn get(&self, code: &str) -> Option<&str> {
        self.sites.get(code).map(String::as_str)
    }

    pub fn fallback(&self) -> &str {
        // Presence checked in `new`.
        self.sites
            .get(FALLBACK_LANGUAGE)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Supported codes in sorted order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.sites.keys().map(String::as_str)
    }

    pub fn contains_location(&self, location: &str) -> bool {
        self.sites.values().any(|v| v == location)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_fallback_entry() {
        let err = SiteMap::new([("de", "de/index.html")]).unwrap_err();
        assert_eq!(err, SiteMapError::MissingFallback("en"));
    }

    #[test]
    fn test_lookup_and_fallback() {
        let sites = SiteMap::new([("en", "en/index.html"), ("de", "de/index.html")]).unwrap();
        assert_eq!(sites.get("de"), Some("de/index.html"));
        assert_eq!(sites.get("fr"), None);
        assert_eq!(sites.fallback(), "en/index.html");
        assert_eq!(sites.languages().collect::<Vec<_>>(), vec!["de", "en"]);
        assert_eq!(sites.len(), 2);
    }
}
