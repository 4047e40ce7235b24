//! The six investment factors.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// An independently scored investment dimension.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    /// Profitability, balance sheet strength and earnings quality
    Quality,
    /// Top-line, bottom-line and cash flow growth
    Growth,
    /// Price relative to earnings, cash flow, assets and payouts
    Value,
    /// Price trend and relative strength
    Momentum,
    /// Price and fundamental stability
    Stability,
    /// Ownership and short-interest positioning
    Positioning,
}

impl Factor {
    /// All factors in canonical order.
    pub const ALL: [Self; 6] = [
        Self::Quality,
        Self::Growth,
        Self::Value,
        Self::Momentum,
        Self::Stability,
        Self::Positioning,
    ];

    /// Returns all factors in canonical order.
    pub fn all() -> Vec<Self> {
        Self::ALL.to_vec()
    }

    /// Stable snake_case identifier.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Growth => "growth",
            Self::Value => "value",
            Self::Momentum => "momentum",
            Self::Stability => "stability",
            Self::Positioning => "positioning",
        }
    }

    /// Position in [`Self::ALL`].
    pub const fn index(&self) -> usize {
        match self {
            Self::Quality => 0,
            Self::Growth => 1,
            Self::Value => 2,
            Self::Momentum => 3,
            Self::Stability => 4,
            Self::Positioning => 5,
        }
    }

    /// Parse a factor from its key or display name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.key().eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_factors() {
        assert_eq!(Factor::all().len(), 6);
        for (i, factor) in Factor::ALL.iter().enumerate() {
            assert_eq!(factor.index(), i);
        }
    }

    #[test]
    fn test_display_and_key() {
        assert_eq!(Factor::Positioning.to_string(), "Positioning");
        assert_eq!(Factor::Positioning.key(), "positioning");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Factor::parse("momentum"), Some(Factor::Momentum));
        assert_eq!(Factor::parse("Value"), Some(Factor::Value));
        assert_eq!(Factor::parse("size"), None);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Factor::Stability).unwrap();
        assert_eq!(json, "\"stability\"");
        let parsed: Factor = serde_json::from_str("\"quality\"").unwrap();
        assert_eq!(parsed, Factor::Quality);
    }
}
