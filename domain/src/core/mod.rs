//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`language::Language`]: recognition/display language setting

pub mod error;
pub mod language;
