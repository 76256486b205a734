//! Common types for addresser.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured representation of a parsed address.
///
/// Fields that could not be determined are empty strings. `id` and
/// `formatted_address` are only filled in when the street line, place name,
/// state and ZIP code are all known.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// URL-safe identifier derived from the formatted address
    pub id: String,
    /// Five-digit ZIP code (or Canadian postal code)
    pub zip_code: String,
    /// Full ZIP+4 token, e.g. "62701-1234"
    pub zip_code_plus_four: String,
    /// Two-letter state abbreviation, e.g. "CA"
    pub state_abbreviation: String,
    /// Full state name, title-cased
    pub state_name: String,
    /// City / place name, title-cased
    pub place_name: String,
    /// Primary street line
    pub address_line1: String,
    /// Secondary unit line, e.g. "Apt 4B"
    pub address_line2: String,
    /// House number
    pub street_number: String,
    /// Street name
    pub street_name: String,
    /// Canonical street suffix, e.g. "Road"
    pub street_suffix: String,
    /// Directional abbreviation, e.g. "NE"
    pub street_direction: String,
    /// Canonical one-line form of the address
    pub formatted_address: String,
}

impl Address {
    /// Whether every field needed for the formatted address is present.
    pub fn is_complete(&self) -> bool {
        !self.address_line1.is_empty()
            && !self.place_name.is_empty()
            && !self.state_abbreviation.is_empty()
            && !self.zip_code.is_empty()
    }

    /// Pretty-printed JSON form of the record.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.formatted_address.is_empty() {
            write!(f, "{}", self.address_line1)
        } else {
            write!(f, "{}", self.formatted_address)
        }
    }
}

/// A city and the abbreviation of the state it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct City {
    /// City name
    pub city: String,
    /// Two-letter state abbreviation
    pub state: String,
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.state)
    }
}

/// Countries recognised as a trailing address segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Country {
    /// United States
    UnitedStates,
    /// Canada
    Canada,
}

impl Country {
    /// Match a trimmed segment against the known country tokens.
    ///
    /// Matching is case-sensitive: "US", "USA", "United States", "Canada".
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "US" | "USA" | "United States" => Some(Country::UnitedStates),
            "Canada" => Some(Country::Canada),
            _ => None,
        }
    }

    /// ISO 3166-1 alpha-2 code.
    pub fn code(&self) -> &'static str {
        match self {
            Country::UnitedStates => "US",
            Country::Canada => "CA",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
