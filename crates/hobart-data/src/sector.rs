//! GICS (Global Industry Classification Standard) sectors and label normalization.
//!
//! Extraction jobs label sectors inconsistently ("Technology", "Information
//! Technology", "tech"). Sector-relative ranking groups securities by label, so
//! every recognized spelling is folded onto the GICS sector name before a
//! snapshot is built. Unrecognized labels pass through unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// GICS Level 1 sectors (11 sectors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GicsSector {
    /// Energy
    Energy,

    /// Materials
    Materials,

    /// Industrials
    Industrials,

    /// Consumer Discretionary
    ConsumerDiscretionary,

    /// Consumer Staples
    ConsumerStaples,

    /// Health Care
    HealthCare,

    /// Financials
    Financials,

    /// Information Technology
    InformationTechnology,

    /// Communication Services
    CommunicationServices,

    /// Utilities
    Utilities,

    /// Real Estate
    RealEstate,
}

impl GicsSector {
    /// Returns all GICS sectors in code order.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Energy,
            Self::Materials,
            Self::Industrials,
            Self::ConsumerDiscretionary,
            Self::ConsumerStaples,
            Self::HealthCare,
            Self::Financials,
            Self::InformationTechnology,
            Self::CommunicationServices,
            Self::Utilities,
            Self::RealEstate,
        ]
    }

    /// Returns the sector code (2-digit).
    pub const fn code(&self) -> u8 {
        match self {
            Self::Energy => 10,
            Self::Materials => 15,
            Self::Industrials => 20,
            Self::ConsumerDiscretionary => 25,
            Self::ConsumerStaples => 30,
            Self::HealthCare => 35,
            Self::Financials => 40,
            Self::InformationTechnology => 45,
            Self::CommunicationServices => 50,
            Self::Utilities => 55,
            Self::RealEstate => 60,
        }
    }

    /// Returns the full sector name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::InformationTechnology => "Information Technology",
            Self::HealthCare => "Health Care",
            Self::Financials => "Financials",
            Self::ConsumerDiscretionary => "Consumer Discretionary",
            Self::CommunicationServices => "Communication Services",
            Self::Industrials => "Industrials",
            Self::ConsumerStaples => "Consumer Staples",
            Self::Energy => "Energy",
            Self::Utilities => "Utilities",
            Self::RealEstate => "Real Estate",
            Self::Materials => "Materials",
        }
    }

    /// Parse a sector from its code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            10 => Some(Self::Energy),
            15 => Some(Self::Materials),
            20 => Some(Self::Industrials),
            25 => Some(Self::ConsumerDiscretionary),
            30 => Some(Self::ConsumerStaples),
            35 => Some(Self::HealthCare),
            40 => Some(Self::Financials),
            45 => Some(Self::InformationTechnology),
            50 => Some(Self::CommunicationServices),
            55 => Some(Self::Utilities),
            60 => Some(Self::RealEstate),
            _ => None,
        }
    }

    /// Parse a sector from a free-form label, a code, or a common alias.
    pub fn parse(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return Self::from_code(code);
        }

        let normalized: String = trimmed
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();

        let sector = match normalized.as_str() {
            "informationtechnology" | "technology" | "it" | "tech" => Self::InformationTechnology,
            "healthcare" | "health" => Self::HealthCare,
            "financials" | "financial" | "financialservices" | "finance" => Self::Financials,
            "consumerdiscretionary" | "consumercyclical" | "discretionary" => {
                Self::ConsumerDiscretionary
            }
            "communicationservices" | "communication" | "telecommunications" | "comms" => {
                Self::CommunicationServices
            }
            "industrials" | "industrial" => Self::Industrials,
            "consumerstaples" | "consumerdefensive" | "staples" => Self::ConsumerStaples,
            "energy" => Self::Energy,
            "utilities" | "utility" => Self::Utilities,
            "realestate" => Self::RealEstate,
            "materials" | "basicmaterials" => Self::Materials,
            _ => return None,
        };

        Some(sector)
    }
}

impl fmt::Display for GicsSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for GicsSector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown sector: {}", s))
    }
}

/// Canonical sector label used for peer grouping.
///
/// Blank labels are unclassified (`None`). Recognized GICS spellings map to the
/// GICS sector name; anything else is kept verbatim after trimming.
pub fn normalize_sector_label(label: &str) -> Option<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(
        GicsSector::parse(trimmed)
            .map_or_else(|| trimmed.to_string(), |s| s.name().to_string()),
    )
}
