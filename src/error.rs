//! Error types.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by configuration validation and population construction.
///
/// Geometry predicates and fitness evaluation never fail on well-formed
/// input: an infeasible layout is encoded as negative-infinity fitness, not
/// as an error. Only the pre-search checks and the initializer's restart
/// budget produce user-visible failures.
#[derive(Debug, Error)]
pub enum Error {
    /// A solver or sheet setting is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Explanation of the rejected setting.
        reason: String,
    },

    /// A piece cannot fit on the sheet in any position.
    #[error(
        "piece `{id}` with extent {extent_x} x {extent_y} cannot fit on the \
         {sheet_width} x {sheet_height} sheet"
    )]
    PieceTooLarge {
        /// Identifier of the offending piece.
        id: String,
        /// Horizontal placement extent of the piece.
        extent_x: f64,
        /// Vertical placement extent of the piece.
        extent_y: f64,
        /// Sheet width.
        sheet_width: f64,
        /// Sheet height.
        sheet_height: f64,
    },

    /// The population initializer exhausted its restart budget without
    /// collecting enough feasible candidates.
    #[error("no feasible population after {attempts} discarded candidates")]
    InfeasiblePopulation {
        /// Candidates discarded before giving up.
        attempts: usize,
    },
}
