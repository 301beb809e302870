//! Scan results handed over by the barcode reader.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Barcode symbology reported by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    /// EAN-13 retail barcode.
    #[serde(rename = "ean_13")]
    Ean13,
    /// EAN-8 retail barcode.
    #[serde(rename = "ean_8")]
    Ean8,
    /// UPC-A retail barcode.
    UpcA,
    /// Code 128 linear barcode.
    #[serde(rename = "code_128")]
    Code128,
    /// QR code.
    Qr,
    /// Data Matrix code.
    DataMatrix,
    /// Anything the reader could not classify.
    #[default]
    Unknown,
}

impl Symbology {
    /// Returns the symbology as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ean13 => "ean_13",
            Self::Ean8 => "ean_8",
            Self::UpcA => "upc_a",
            Self::Code128 => "code_128",
            Self::Qr => "qr",
            Self::DataMatrix => "data_matrix",
            Self::Unknown => "unknown",
        }
    }

    /// Parses a symbology tag; unrecognized tags map to `Unknown`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let tag: String = s
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_lowercase();
        match tag.as_str() {
            "ean13" => Self::Ean13,
            "ean8" => Self::Ean8,
            "upca" => Self::UpcA,
            "code128" => Self::Code128,
            "qr" | "qrcode" => Self::Qr,
            "datamatrix" | "matrix" => Self::DataMatrix,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One decoded scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Unique scan ID (UUID v4).
    pub id: String,
    /// Decoded text.
    pub code: String,
    /// Symbology reported by the reader.
    pub symbology: Symbology,
    /// When the scan happened (Unix epoch seconds).
    pub scanned_at: u64,
}
