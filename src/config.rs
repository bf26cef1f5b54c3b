//! Grid geometry and drop defaults.
//!
//! Loaded from JSON (every field optional) or built in code. Values are
//! validated once at load time; the layout engine itself never rejects
//! geometry at interaction time.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::model::Span;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Horizontal gap between columns and vertical gap between rows.
    pub gap_px: f64,
    pub row_height_px: f64,
    /// Height of the hit band centred on each row boundary.
    pub boundary_band_px: f64,
    /// Width of the resize handle on the right edge of half cards.
    pub resize_handle_px: f64,
    /// Span for half cards dropped on a row boundary.
    pub default_span: u8,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            gap_px: 16.0,
            row_height_px: 240.0,
            boundary_band_px: 24.0,
            resize_handle_px: 8.0,
            default_span: crate::model::DEFAULT_SPAN,
        }
    }
}

impl GridConfig {
    /// Geometry where one pixel is one terminal cell.
    pub fn terminal() -> Self {
        Self {
            gap_px: 1.0,
            row_height_px: 4.0,
            boundary_band_px: 1.0,
            resize_handle_px: 1.0,
            ..Self::default()
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        let finite_non_negative = [
            ("gap_px", self.gap_px),
            ("boundary_band_px", self.boundary_band_px),
            ("resize_handle_px", self.resize_handle_px),
        ];
        for (name, value) in finite_non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(GridError::InvalidConfig(format!(
                    "{name} must be a finite, non-negative number (got {value})"
                )));
            }
        }
        if !self.row_height_px.is_finite() || self.row_height_px <= 0.0 {
            return Err(GridError::InvalidConfig(format!(
                "row_height_px must be positive (got {})",
                self.row_height_px
            )));
        }
        Ok(())
    }

    pub fn default_span(&self) -> Span {
        Span::clamped(i32::from(self.default_span))
    }
}
