//! Weight units and conversion
//!
//! Items store the weight exactly as entered together with its unit; any
//! aggregation (pack totals, imports from other apps) converts through
//! grams.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Grams per ounce (international avoirdupois ounce)
pub const GRAMS_PER_OUNCE: f64 = 28.349_523_125;
/// Grams per pound (international avoirdupois pound)
pub const GRAMS_PER_POUND: f64 = 453.592_37;
/// Grams per kilogram
pub const GRAMS_PER_KILOGRAM: f64 = 1000.0;

/// Weight unit as stored on an item (`g`, `kg`, `oz`, `lb`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    G,
    Kg,
    Oz,
    Lb,
}

impl WeightUnit {
    pub const ALL: [WeightUnit; 4] = [Self::G, Self::Kg, Self::Oz, Self::Lb];

    /// Canonical short form persisted in the `unit` column
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::G => "g",
            Self::Kg => "kg",
            Self::Oz => "oz",
            Self::Lb => "lb",
        }
    }

    /// How many grams one of this unit weighs
    pub const fn grams(&self) -> f64 {
        match self {
            Self::G => 1.0,
            Self::Kg => GRAMS_PER_KILOGRAM,
            Self::Oz => GRAMS_PER_OUNCE,
            Self::Lb => GRAMS_PER_POUND,
        }
    }

    /// Normalize a user-entered unit token.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Accepts the canonical forms plus common spellings: `gram(s)`,
    /// `kilogram(s)`, `ounce(s)`, `lbs`, `pound(s)`.
    pub fn parse_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "g" | "gram" | "grams" => Some(Self::G),
            "kg" | "kilogram" | "kilograms" => Some(Self::Kg),
            "oz" | "ounce" | "ounces" => Some(Self::Oz),
            "lb" | "lbs" | "pound" | "pounds" => Some(Self::Lb),
            _ => None,
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit token that no synonym matches
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid unit: {0}")]
pub struct InvalidUnit(pub String);

impl FromStr for WeightUnit {
    type Err = InvalidUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_token(s).ok_or_else(|| InvalidUnit(s.trim().to_string()))
    }
}

/// Convert a weight between units.
///
/// Same-unit conversion returns the value untouched.
pub fn convert_weight(value: f64, from: WeightUnit, to: WeightUnit) -> f64 {
    if from == to {
        return value;
    }
    value * from.grams() / to.grams()
}

/// Measurement system a user prefers for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UnitSystem {
    Imperial,
    Metric,
}

impl UnitSystem {
    /// Parse the value stored on the user row (`METRIC` / `IMPERIAL`)
    pub fn from_db(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "METRIC" => Some(Self::Metric),
            "IMPERIAL" => Some(Self::Imperial),
            _ => None,
        }
    }

    pub const fn as_db(&self) -> &'static str {
        match self {
            Self::Metric => "METRIC",
            Self::Imperial => "IMPERIAL",
        }
    }

    /// Unit used for summary weights in this system
    pub const fn summary_unit(&self) -> WeightUnit {
        match self {
            Self::Metric => WeightUnit::G,
            Self::Imperial => WeightUnit::Oz,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_synonyms() {
        assert_eq!(WeightUnit::parse_token("Pounds"), Some(WeightUnit::Lb));
        assert_eq!(WeightUnit::parse_token("LBS"), Some(WeightUnit::Lb));
        assert_eq!(WeightUnit::parse_token(" grams "), Some(WeightUnit::G));
        assert_eq!(WeightUnit::parse_token("Kilogram"), Some(WeightUnit::Kg));
        assert_eq!(WeightUnit::parse_token("ounce"), Some(WeightUnit::Oz));
        assert_eq!(WeightUnit::parse_token("OZ"), Some(WeightUnit::Oz));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(WeightUnit::parse_token("xyz"), None);
        assert_eq!(WeightUnit::parse_token("stone"), None);
        assert_eq!(WeightUnit::parse_token(""), None);

        let err = "xyz".parse::<WeightUnit>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid unit: xyz");
    }

    #[test]
    fn test_convert_known_values() {
        assert!((convert_weight(1.0, WeightUnit::Lb, WeightUnit::Oz) - 16.0).abs() < 1e-9);
        assert!((convert_weight(1.0, WeightUnit::Kg, WeightUnit::G) - 1000.0).abs() < 1e-9);
        assert!(
            (convert_weight(1.0, WeightUnit::Oz, WeightUnit::G) - GRAMS_PER_OUNCE).abs() < 1e-9
        );
        assert_eq!(convert_weight(42.5, WeightUnit::G, WeightUnit::G), 42.5);
    }

    #[test]
    fn test_round_trip_grams_through_ounces() {
        let oz = convert_weight(100.0, WeightUnit::G, WeightUnit::Oz);
        let back = convert_weight(oz, WeightUnit::Oz, WeightUnit::G);
        assert!(((back - 100.0) / 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_round_trip_every_pair() {
        for from in WeightUnit::ALL {
            for to in WeightUnit::ALL {
                let there = convert_weight(737.0, from, to);
                let back = convert_weight(there, to, from);
                assert!(((back - 737.0) / 737.0).abs() < 1e-9, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_unit_system() {
        assert_eq!(UnitSystem::from_db("metric"), Some(UnitSystem::Metric));
        assert_eq!(UnitSystem::from_db("IMPERIAL"), Some(UnitSystem::Imperial));
        assert_eq!(UnitSystem::from_db("other"), None);
        assert_eq!(UnitSystem::Imperial.summary_unit(), WeightUnit::Oz);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&WeightUnit::Kg).unwrap(), "\"kg\"");
        let unit: WeightUnit = serde_json::from_str("\"lb\"").unwrap();
        assert_eq!(unit, WeightUnit::Lb);
    }
}
