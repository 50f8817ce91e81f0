//! Piece types and placement state.

use rand::Rng;

use crate::error::{Error, Result};
use crate::sheet::Sheet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identifier for a piece.
pub type PieceId = String;

/// Discrete rotation angle tracked on rotation-aware pieces.
///
/// Rotation is carried through mutation and crossover as placement state but
/// does not alter the geometry used by collision or bounds tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rotation {
    /// 0 degrees.
    #[default]
    R0,
    /// 90 degrees.
    R90,
    /// 180 degrees.
    R180,
    /// 270 degrees.
    R270,
}

impl Rotation {
    /// All representable angles.
    pub const ALL: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

    /// Returns the angle in degrees.
    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }

    /// Draws a uniformly random rotation.
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Shape and dimensions of a piece.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PieceKind {
    /// Axis-aligned rectangle; placement `x, y` is the bottom-left origin.
    Rectangle {
        /// Rectangle width.
        width: f64,
        /// Rectangle height.
        height: f64,
    },
    /// Circle; placement `x, y` is the center.
    Circle {
        /// Circle radius.
        radius: f64,
    },
}

/// A piece to place, with its current placement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Piece {
    /// Unique identifier.
    pub id: PieceId,
    /// Shape and dimensions.
    pub kind: PieceKind,
    /// Placement x coordinate (origin for rectangles, center for circles).
    pub x: f64,
    /// Placement y coordinate.
    pub y: f64,
    /// Tracked rotation, present only on rotation-aware pieces.
    pub rotation: Option<Rotation>,
}

impl Piece {
    /// Creates a rectangular piece placed at the origin.
    pub fn rectangle(id: impl Into<PieceId>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            kind: PieceKind::Rectangle { width, height },
            x: 0.0,
            y: 0.0,
            rotation: None,
        }
    }

    /// Creates a circular piece centered at the origin.
    pub fn circle(id: impl Into<PieceId>, radius: f64) -> Self {
        Self {
            id: id.into(),
            kind: PieceKind::Circle { radius },
            x: 0.0,
            y: 0.0,
            rotation: None,
        }
    }

    /// Enables rotation tracking, starting at 0 degrees.
    pub fn with_rotation_tracking(mut self) -> Self {
        self.rotation = Some(Rotation::R0);
        self
    }

    /// Sets the placement coordinates.
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Returns true if this piece carries a rotation gene.
    pub fn tracks_rotation(&self) -> bool {
        self.rotation.is_some()
    }

    /// Horizontal extent used by placement sampling and bounds checks.
    ///
    /// Rectangles use their width. Circles use the radius: placement is
    /// center-based and only the upper side subtracts the extent.
    pub fn extent_x(&self) -> f64 {
        match self.kind {
            PieceKind::Rectangle { width, .. } => width,
            PieceKind::Circle { radius } => radius,
        }
    }

    /// Vertical extent, see [`extent_x`](Self::extent_x).
    pub fn extent_y(&self) -> f64 {
        match self.kind {
            PieceKind::Rectangle { height, .. } => height,
            PieceKind::Circle { radius } => radius,
        }
    }

    /// Scoring area used by the waste objective.
    ///
    /// Circles score `radius * radius`. The objective only ranks candidates
    /// against each other, so the metric needs internal consistency, not
    /// physical accuracy.
    pub fn scoring_area(&self) -> f64 {
        match self.kind {
            PieceKind::Rectangle { width, height } => width * height,
            PieceKind::Circle { radius } => radius * radius,
        }
    }

    /// Validates the piece dimensions against the sheet.
    ///
    /// Rejects non-positive dimensions and pieces whose minimum extent
    /// already exceeds the sheet.
    pub fn validate(&self, sheet: &Sheet) -> Result<()> {
        let positive = match self.kind {
            PieceKind::Rectangle { width, height } => {
                width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
            }
            PieceKind::Circle { radius } => radius.is_finite() && radius > 0.0,
        };
        if !positive {
            return Err(Error::InvalidConfig {
                reason: format!("piece `{}` must have positive finite dimensions", self.id),
            });
        }
        if self.extent_x() > sheet.width || self.extent_y() > sheet.height {
            return Err(Error::PieceTooLarge {
                id: self.id.clone(),
                extent_x: self.extent_x(),
                extent_y: self.extent_y(),
                sheet_width: sheet.width,
                sheet_height: sheet.height,
            });
        }
        Ok(())
    }
}
