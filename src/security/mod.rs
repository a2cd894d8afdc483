//! Security hardening subsystem.
//!
//! # Responsibilities
//! - Security response headers (headers.rs)
//! - Request size and concurrency bounds are wired in `http::server`
//!   from `SecurityConfig` and `ListenerConfig`

pub mod headers;
