//! Kiova Core - Shared types and pure logic.
//!
//! This crate provides the domain model used by the `storefront` crate and
//! the logic that runs over collections already fetched from the backend.
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Everything here can be unit tested without a backend.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices and emails, plus the
//!   clothing item, outfit and user records
//! - [`listing`] - Search, filters, sort orders and stats for item lists
//! - [`onboarding`] - Style moods and the onboarding stage machine
//! - [`styling`] - Outfit composition and recommendations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod listing;
pub mod onboarding;
pub mod styling;
pub mod types;

pub use types::*;
