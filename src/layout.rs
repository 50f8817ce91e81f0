//! Candidate layouts and the sequential feasibility filter.

use crate::geometry::{in_bounds, overlaps};
use crate::piece::Piece;
use crate::sheet::Sheet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An ordered assignment of placements to every piece in the catalog.
///
/// All candidates in a run share the same piece identities and order; only
/// `x`, `y` and `rotation` vary between them. Feasibility is order-dependent:
/// each piece is tested against the pieces before it in the stored order,
/// never against later ones.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Layout {
    pieces: Vec<Piece>,
}

impl Layout {
    /// Creates a layout from an ordered piece list.
    pub fn new(pieces: Vec<Piece>) -> Self {
        Self { pieces }
    }

    /// Returns the placed pieces in order.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Mutable access for the evolutionary operators.
    pub(crate) fn pieces_mut(&mut self) -> &mut [Piece] {
        &mut self.pieces
    }

    /// Number of pieces.
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Returns true if the layout holds no pieces.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Walks the stored order and accepts the layout only if every piece is
    /// in bounds and overlap-free against the pieces accepted before it.
    ///
    /// A single violation rejects the whole layout; no repositioning is
    /// attempted. One deterministic pass decides the outcome.
    pub fn is_feasible(&self, sheet: &Sheet) -> bool {
        for (i, piece) in self.pieces.iter().enumerate() {
            if !in_bounds(piece, sheet) {
                return false;
            }
            if self.pieces[..i].iter().any(|earlier| overlaps(piece, earlier)) {
                return false;
            }
        }
        true
    }

    /// Total scoring area of all pieces.
    pub fn used_area(&self) -> f64 {
        self.pieces.iter().map(Piece::scoring_area).sum()
    }

    /// Sheet area not covered by pieces.
    pub fn wasted_area(&self, sheet: &Sheet) -> f64 {
        sheet.area() - self.used_area()
    }

    /// Fitness of this layout on the given sheet.
    ///
    /// Infeasible layouts score negative infinity; feasible layouts score
    /// their negated wasted area, so less waste ranks higher. Pure: no
    /// placement is modified.
    pub fn fitness(&self, sheet: &Sheet) -> f64 {
        if self.is_feasible(sheet) {
            -self.wasted_area(sheet)
        } else {
            f64::NEG_INFINITY
        }
    }
}
