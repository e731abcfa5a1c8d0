//! # repopack-ports
//!
//! Port traits for the repopack hexagonal architecture.
//!
//! This crate defines the interfaces between the domain and infrastructure
//! layers. It depends only on `domain` and `shared`.
//!
//! Ports are synchronous: the packing pipeline reads one file at a time and
//! never suspends.

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod encoding;
pub mod filesystem;
pub mod ignore;
pub mod logger;

pub use encoding::*;
pub use filesystem::*;
pub use ignore::*;
pub use logger::*;

// Re-export selected domain types used in port signatures, so adapter crates
// can implement ports without directly depending on `repopack-domain`.
pub use repopack_domain::IgnorePatterns;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ports_crate_version_is_set() {
        assert!(!ports_crate_version().is_empty());
    }
}
