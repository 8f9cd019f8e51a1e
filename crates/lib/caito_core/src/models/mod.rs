//! Domain models.
//!
//! These are internal domain types; the HTTP response envelopes live in
//! `caito_api::models`.

pub mod chat;
pub mod contact;
