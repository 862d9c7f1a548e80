//! Service layer for business logic
//!
//! Shared between the HTTP handlers and the CLI.

pub mod geoip;
mod ip_check;
mod retention;

pub use geoip::{ExternalApiProvider, GeoDetails, GeoLookup, LookupError};
pub use ip_check::*;
pub use retention::{CleanupReport, RetentionTask};
