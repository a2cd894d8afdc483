//! Accept-Language redirect service library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod negotiation;
pub mod observability;
pub mod security;

pub use config::RedirectConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use negotiation::{resolve, resolve_location, SiteMap};
