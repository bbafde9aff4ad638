//! Item classification enums.
//!
//! Categories and conditions are closed sets in the UI, but the backend
//! (and the AI extractor in particular) can hand back anything. Unknown
//! values decode as `None` through [`lenient`] instead of failing a whole
//! collection.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Clothing item category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Tops,
    Bottoms,
    Dresses,
    Outerwear,
    Shoes,
    Accessories,
    Bags,
    Jewelry,
}

impl Category {
    /// Every category, in the order the wardrobe tabs list them.
    pub const ALL: [Self; 8] = [
        Self::Tops,
        Self::Bottoms,
        Self::Dresses,
        Self::Outerwear,
        Self::Shoes,
        Self::Accessories,
        Self::Bags,
        Self::Jewelry,
    ];

    /// Wire name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tops => "tops",
            Self::Bottoms => "bottoms",
            Self::Dresses => "dresses",
            Self::Outerwear => "outerwear",
            Self::Shoes => "shoes",
            Self::Accessories => "accessories",
            Self::Bags => "bags",
            Self::Jewelry => "jewelry",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tops => "Tops",
            Self::Bottoms => "Bottoms",
            Self::Dresses => "Dresses",
            Self::Outerwear => "Outerwear",
            Self::Shoes => "Shoes",
            Self::Accessories => "Accessories",
            Self::Bags => "Bags",
            Self::Jewelry => "Jewelry",
        }
    }

    /// Whether the category belongs to the accessories family
    /// (accessories, bags, jewelry).
    #[must_use]
    pub const fn is_accessory(self) -> bool {
        matches!(self, Self::Accessories | Self::Bags | Self::Jewelry)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known classification value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownValue {
    kind: &'static str,
    value: String,
}

impl UnknownValue {
    /// Create an error for `value` of the named kind.
    #[must_use]
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl FromStr for Category {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| UnknownValue::new("category", s))
    }
}

/// Physical condition of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    New,
    LikeNew,
    #[default]
    Good,
    Fair,
}

impl Condition {
    /// Every condition, best first.
    pub const ALL: [Self; 4] = [Self::New, Self::LikeNew, Self::Good, Self::Fair];

    /// Wire name of the condition.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::LikeNew => "like-new",
            Self::Good => "good",
            Self::Fair => "fair",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::LikeNew => "Like New",
            Self::Good => "Good",
            Self::Fair => "Fair",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| UnknownValue::new("condition", s))
    }
}

/// Serde adapter decoding unknown enum strings as `None`.
pub mod lenient {
    use core::str::FromStr;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize an optional value with its normal representation.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::ref_option)]
    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        value.serialize(serializer)
    }

    /// Deserialize an optional string and parse it, mapping failures to `None`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the value is not a string or `null`.
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: FromStr,
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|s| s.parse().ok()))
    }
}
