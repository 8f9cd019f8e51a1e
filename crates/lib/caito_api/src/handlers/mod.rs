//! Request handlers.

pub mod chat;
pub mod fallback;
pub mod proxy;
pub mod request;
