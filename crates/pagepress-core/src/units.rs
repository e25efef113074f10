//! Physical length units and conversion.
//!
//! Everything inside the scene model is measured in pixels at a fixed
//! render resolution of 300 px/inch. Physical units only appear at the
//! edges: project configuration (page sizes entered in mm/cm/in) and the
//! vector exporter (PDF pages sized in mm). Conversions go through exact
//! decimal factors so repeated round-trips do not drift.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed render resolution, pixels per inch.
pub const RENDER_DPI: u32 = 300;

/// Pixels per typographic point (300 / 72).
pub const PX_PER_PT: f64 = RENDER_DPI as f64 / 72.0;

/// Unit conversion errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnitError {
    #[error("unsupported unit: {0:?}")]
    Unsupported(String),
    #[error("value is not a finite number: {0:?}")]
    InvalidValue(String),
}

/// A recognized physical length unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Pixels at the fixed render resolution.
    Px,
    /// Inches.
    In,
    /// Centimetres.
    Cm,
    /// Millimetres.
    Mm,
    /// Typographic points (1/72 inch).
    Pt,
}

impl Unit {
    /// Parse a unit label as it appears in form input ("mm", "cm", "in", "px", "pt").
    pub fn parse(label: &str) -> Result<Self, UnitError> {
        match label.trim().to_ascii_lowercase().as_str() {
            "px" => Ok(Unit::Px),
            "in" => Ok(Unit::In),
            "cm" => Ok(Unit::Cm),
            "mm" => Ok(Unit::Mm),
            "pt" => Ok(Unit::Pt),
            other => Err(UnitError::Unsupported(other.to_string())),
        }
    }

    /// Short label for display.
    pub fn label(self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::In => "in",
            Unit::Cm => "cm",
            Unit::Mm => "mm",
            Unit::Pt => "pt",
        }
    }

    /// Pixels per one of this unit, as an exact decimal.
    fn px_factor(self) -> Decimal {
        let dpi = Decimal::from(RENDER_DPI);
        match self {
            Unit::Px => Decimal::ONE,
            Unit::In => dpi,
            // 2.54 cm per inch
            Unit::Cm => dpi / Decimal::new(254, 2),
            // 25.4 mm per inch
            Unit::Mm => dpi / Decimal::new(254, 1),
            Unit::Pt => dpi / Decimal::from(72),
        }
    }
}

/// Convert a length between two recognized units through the px anchor.
pub fn convert_length(value: Decimal, from: Unit, to: Unit) -> Decimal {
    if from == to {
        return value;
    }
    value * from.px_factor() / to.px_factor()
}

/// Convert an `f64` length between units, routing through decimal arithmetic.
///
/// Returns `UnitError::InvalidValue` for NaN/infinite input rather than
/// propagating a garbage coordinate into the output document.
pub fn convert_length_f64(value: f64, from: Unit, to: Unit) -> Result<f64, UnitError> {
    let decimal =
        Decimal::from_f64(value).ok_or_else(|| UnitError::InvalidValue(format!("{value}")))?;
    let converted = convert_length(decimal, from, to);
    converted
        .to_f64()
        .ok_or_else(|| UnitError::InvalidValue(format!("{converted}")))
}

/// Convert an internal px length to millimetres for export.
pub fn px_to_mm(px: f64) -> Result<f64, UnitError> {
    convert_length_f64(px, Unit::Px, Unit::Mm)
}
