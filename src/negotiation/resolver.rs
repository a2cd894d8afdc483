//! Landing page selection.
//!
//! # Responsibilities
//! - Rank the client's language preferences
//! - Pick the first preference the site map supports
//! - Fall back to the default language otherwise
//!
//! # Design Decisions
//! - Pure function of (header, site map): no request, no globals
//! - Every outcome is a URL taken from the site map

use crate::negotiation::accept_language::{parse_accept_language_with, InvalidWeight};
use crate::negotiation::site_map::{SiteMap, FALLBACK_LANGUAGE};

/// Outcome of resolving one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Site map code that was selected.
    pub language: String,
    /// Redirect target.
    pub location: String,
    /// True when no client preference matched.
    pub fallback: bool,
}

/// Resolve an optional `Accept-Language` value against the site map.
pub fn resolve(header: Option<&str>, sites: &SiteMap) -> Resolution {
    resolve_with(header, sites, InvalidWeight::default())
}

/// [`resolve`] with an explicit policy for bad q-factors.
pub fn resolve_with(header: Option<&str>, sites: &SiteMap, policy: InvalidWeight) -> Resolution {
    match first_match(header, sites, policy) {
        Some((code, location)) => Resolution {
            language: code,
            location: location.to_string(),
            fallback: false,
        },
        None => Resolution {
            language: FALLBACK_LANGUAGE.to_string(),
            location: sites.fallback().to_string(),
            fallback: true,
        },
    }
}

/// Shorthand for [`resolve`] when only the URL matters.
pub fn resolve_location<'a>(header: Option<&str>, sites: &'a SiteMap) -> &'a str {
    first_match(header, sites, InvalidWeight::default())
        .map(|(_, location)| location)
        .unwrap_or_else(|| sites.fallback())
}

/// Highest-ranked preference the site map supports, as (code, location).
fn first_match<'a>(
    header: Option<&str>,
    sites: &'a SiteMap,
    policy: InvalidWeight,
) -> Option<(String, &'a str)> {
    let preferences = header
        .map(|h| parse_accept_language_with(h, policy))
        .unwrap_or_default();

    preferences.iter().find_map(|p| {
        let code = p.code();
        sites.get(&code).map(|location| (code, location))
    })
}
