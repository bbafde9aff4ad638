//! Type-safe price representation using decimal arithmetic.
//!
//! Item prices travel over the wire as plain JSON numbers in US dollars.
//! Internally they are [`Decimal`] so bucket boundaries and totals never
//! suffer from float rounding.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in US dollars, the only currency the marketplace lists in.
    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }

    /// Sum optional item prices, counting missing prices as zero.
    pub fn total<'a, I>(prices: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a Decimal>>,
    {
        Self::usd(prices.into_iter().flatten().copied().sum())
    }

    /// Format with two decimal places (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }

    /// Format rounded to whole units (e.g., "$120").
    #[must_use]
    pub fn display_whole(&self) -> String {
        format!("{}{}", self.currency_code.symbol(), self.amount.round())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD => "$",
        }
    }
}

/// Serde adapter for optional prices sent as JSON numbers.
///
/// Accepts numbers, numeric strings and `null` on input; always writes a
/// JSON number (or `null`).
pub mod amount {
    use rust_decimal::Decimal;
    use rust_decimal::prelude::ToPrimitive;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(serde_json::Number),
        Text(String),
    }

    /// Serialize an optional decimal as a JSON number.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::ref_option)]
    pub fn serialize<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value.and_then(|d| d.to_f64()) {
            Some(f) => serializer.serialize_some(&f),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize an optional decimal from a number, a numeric string, or `null`.
    ///
    /// Blank or unparseable strings decode as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is neither a number, a string nor `null`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawAmount>::deserialize(deserializer)?;
        Ok(raw.and_then(|raw| match raw {
            RawAmount::Number(n) => parse(&n.to_string()),
            RawAmount::Text(s) => parse(&s),
        }))
    }

    /// Parse a decimal amount from user or wire text.
    #[must_use]
    pub fn parse(s: &str) -> Option<Decimal> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        s.parse::<Decimal>()
            .ok()
            .or_else(|| Decimal::from_scientific(s).ok())
    }
}
