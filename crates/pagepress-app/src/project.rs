//! New-project configuration surface.
//!
//! Page dimensions arrive from form input as numeric strings with a unit
//! label. Validation and conversion happen here; the core only ever
//! receives finished px values.

use pagepress_core::shapes::Rgba;
use pagepress_core::store::{Page, SceneCommand, StoreError, StoreHandle};
use pagepress_core::units::{convert_length, Unit, UnitError};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Project setup errors.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("invalid length value: {0:?}")]
    InvalidNumber(String),
    #[error(transparent)]
    Unit(#[from] UnitError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A validated physical length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalLength {
    pub value: Decimal,
    pub unit: Unit,
}

impl PhysicalLength {
    pub fn new(value: Decimal, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Parse form input: a numeric string plus a unit label. Rejects
    /// non-numeric and non-positive values.
    pub fn parse(value: &str, unit: &str) -> Result<Self, ProjectError> {
        let unit = Unit::parse(unit)?;
        let parsed: Decimal = value
            .trim()
            .parse()
            .map_err(|_| ProjectError::InvalidNumber(value.to_string()))?;
        if parsed <= Decimal::ZERO {
            return Err(ProjectError::InvalidNumber(value.to_string()));
        }
        Ok(Self {
            value: parsed,
            unit,
        })
    }

    /// The length in px at the render resolution.
    pub fn to_px(self) -> Result<f64, ProjectError> {
        convert_length(self.value, self.unit, Unit::Px)
            .to_f64()
            .ok_or_else(|| ProjectError::InvalidNumber(self.value.to_string()))
    }
}

/// Configuration collected by the "new project" flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSpec {
    pub name: String,
    pub width: PhysicalLength,
    pub height: PhysicalLength,
}

impl ProjectSpec {
    /// A4 portrait preset.
    pub fn a4(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width: PhysicalLength::new(Decimal::from(210), Unit::Mm),
            height: PhysicalLength::new(Decimal::from(297), Unit::Mm),
        }
    }
}

/// Initialize a store with the project's first page and put it in view.
pub fn create_project(handle: &StoreHandle, spec: &ProjectSpec) -> Result<(), ProjectError> {
    let width = spec.width.to_px()?;
    let height = spec.height.to_px()?;
    log::info!(
        "creating project {:?} ({:.1} x {:.1} px)",
        spec.name,
        width,
        height
    );
    handle.commit(SceneCommand::AddPage(Page::new(width, height, Rgba::WHITE)))?;
    handle.commit(SceneCommand::SetEstimatedCurrentPage(0))?;
    Ok(())
}
