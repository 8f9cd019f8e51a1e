//! # caito_core
//!
//! Core domain logic for the CAITO request gateway: field sanitation and
//! validation, contact-request sinks, the catalog/log proxy client and the
//! chat-model client.

pub mod chat;
pub mod llm;
pub mod migrate;
pub mod models;
pub mod proxy;
pub mod sanitize;
pub mod sink;
pub mod validation;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
