//! Sheet (stock material) definition.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The rectangular stock sheet that pieces are placed on.
///
/// Dimensions are fixed for the duration of a run and shared read-only by
/// every component.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sheet {
    /// Sheet width.
    pub width: f64,
    /// Sheet height.
    pub height: f64,
}

impl Sheet {
    /// Creates a new sheet with the given dimensions.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns the total sheet area.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Validates the sheet dimensions.
    pub fn validate(&self) -> Result<()> {
        if !self.width.is_finite()
            || !self.height.is_finite()
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(Error::InvalidConfig {
                reason: format!(
                    "sheet dimensions must be positive, got {} x {}",
                    self.width, self.height
                ),
            });
        }
        Ok(())
    }
}
