//! Storefront-side models.
//!
//! Backend records live in `kiova_core`; this module only holds what the
//! storefront keeps for itself.

pub mod session;

pub use session::{StyleSession, keys as session_keys};
