//! Language negotiation subsystem.
//!
//! # Data Flow
//! ```text
//! Accept-Language header (optional)
//!     → accept_language.rs (tokenize, weigh, rank)
//!     → resolver.rs (first supported code wins)
//!     → site_map.rs (code → landing page, "en" fallback)
//!     → redirect target
//! ```

pub mod accept_language;
pub mod resolver;
pub mod site_map;

pub use accept_language::{
    parse_accept_language, parse_accept_language_with, InvalidWeight, LanguagePreference,
};
pub use resolver::{resolve, resolve_location, resolve_with, Resolution};
pub use site_map::{SiteMap, SiteMapError, FALLBACK_LANGUAGE};
