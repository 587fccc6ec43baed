//! Platform definitions for device support.
//!
//! This module defines vendor-specific configuration including the
//! prompt pattern, login quirks, and output normalization.

mod definition;
pub mod vendors;

pub use definition::{LoginChallenge, PlatformDefinition};

/// Trait for vendor-specific behavior.
pub trait VendorBehavior: Send + Sync {
    /// Normalize command output (strip command echo, trailing prompt).
    fn normalize_output(&self, raw: &str, command: &str) -> String;
}

