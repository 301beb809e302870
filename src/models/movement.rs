//! Stock movement records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Goods received (donations, deliveries).
    Inbound,
    /// Goods handed out.
    Outbound,
    /// Correction after a physical count.
    Adjustment,
    /// Goods lost to damage or expiry.
    Shrinkage,
}

impl MovementType {
    /// Returns the movement type as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
            Self::Adjustment => "adjustment",
            Self::Shrinkage => "shrinkage",
        }
    }

    /// Parses a movement type (case-insensitive).
    ///
    /// Accepts the Spanish labels used on the intake floor as aliases.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "inbound" | "in" | "entrada" => Some(Self::Inbound),
            "outbound" | "out" | "salida" => Some(Self::Outbound),
            "adjustment" | "ajuste" => Some(Self::Adjustment),
            "shrinkage" | "merma" => Some(Self::Shrinkage),
            _ => None,
        }
    }

    /// Returns true if the movement adds stock.
    #[must_use]
    pub const fn is_inbound(&self) -> bool {
        matches!(self, Self::Inbound)
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded change to a product's stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    /// Unique movement ID (UUID v4).
    pub id: String,
    /// Barcode of the affected product.
    pub barcode: String,
    /// Movement kind.
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    /// Units moved (always positive).
    pub quantity: u32,
    /// When the movement was recorded (Unix epoch seconds).
    pub recorded_at: u64,
    /// Who recorded it.
    pub operator: String,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Reason code, e.g. "caducado".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!(MovementType::parse("entrada"), Some(MovementType::Inbound));
        assert_eq!(MovementType::parse("SALIDA"), Some(MovementType::Outbound));
        assert_eq!(MovementType::parse("merma"), Some(MovementType::Shrinkage));
        assert_eq!(MovementType::parse("ajuste"), Some(MovementType::Adjustment));
        assert_eq!(MovementType::parse("transfer"), None);
    }

    #[test]
    fn test_only_inbound_adds_stock() {
        assert!(MovementType::Inbound.is_inbound());
        assert!(!MovementType::Outbound.is_inbound());
        assert!(!MovementType::Adjustment.is_inbound());
        assert!(!MovementType::Shrinkage.is_inbound());
    }

    #[test]
    fn test_movement_serializes_type_field() {
        let movement = StockMovement {
            id: "m1".to_string(),
            barcode: "7501".to_string(),
            movement_type: MovementType::Outbound,
            quantity: 2,
            recorded_at: 10,
            operator: "turno-a".to_string(),
            notes: None,
            reason: None,
        };
        let json = serde_json::to_value(&movement).unwrap();
        assert_eq!(json["type"], "outbound");
        assert!(json.get("notes").is_none());
    }
}
