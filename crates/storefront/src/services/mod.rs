//! Business logic services for storefront.
//!
//! # Services
//!
//! - `wardrobe` - Photo import (upload + AI extraction) and batch item creation

pub mod wardrobe;

pub use wardrobe::{BatchCreateError, PhotoImport, UploadedPhoto};
