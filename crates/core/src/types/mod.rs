//! Core types for Kiova.
//!
//! This module provides type-safe wrappers for backend records and the
//! value types they are built from.

pub mod category;
pub mod email;
pub mod id;
pub mod item;
pub mod outfit;
pub mod price;
pub mod user;
pub mod wire;

pub use category::{Category, Condition, UnknownValue};
pub use email::{Email, EmailError};
pub use id::*;
pub use item::{ClothingItem, ItemDraft, NewClothingItem, PLACEHOLDER_ITEM_NAME};
pub use outfit::{NewOutfit, Outfit};
pub use price::{CurrencyCode, Price};
pub use user::{User, UserUpdate};
