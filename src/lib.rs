//! # DE-Nesting
//!
//! Differential-evolution search for non-overlapping placements of 2D pieces
//! (axis-aligned rectangles and circles) on a bounded sheet, minimizing
//! wasted area.
//!
//! The engine evolves continuous placement coordinates with a steady-state
//! DE/rand/1 loop and validates every candidate with a discrete sequential
//! feasibility filter: pieces are checked in catalog order, each against the
//! pieces accepted before it. Feasible candidates score their negated wasted
//! area; infeasible ones score negative infinity and can never displace a
//! feasible incumbent.
//!
//! ## Core Components
//!
//! - **Geometry predicates**: [`overlaps`], [`in_bounds`]
//! - **Layouts and feasibility**: [`Layout`]
//! - **Search engine**: [`DeRunner`], [`DeConfig`], [`DeResult`]
//! - **Visualization boundary**: [`LayoutRenderer`], [`NoopRenderer`]
//!
//! ## Quick Start
//!
//! ```rust
//! use de_nesting::{DeConfig, DeRunner, Piece, Sheet};
//!
//! let sheet = Sheet::new(100.0, 100.0);
//! let catalog = vec![
//!     Piece::rectangle("panel", 30.0, 20.0).with_rotation_tracking(),
//!     Piece::rectangle("strip", 40.0, 10.0),
//!     Piece::circle("disc", 10.0),
//! ];
//!
//! let config = DeConfig::new()
//!     .with_population_size(30)
//!     .with_max_generations(50);
//!
//! let result = DeRunner::new(config, sheet, catalog).run().unwrap();
//!
//! assert!(result.best.is_feasible(&sheet));
//! println!("wasted area: {:.1}", -result.best_fitness);
//! ```
//!
//! ## Known Geometry Gaps
//!
//! Two behaviors are preserved deliberately and pinned by regression tests
//! (see [`geometry`]): mixed rectangle/circle pairs are never reported as
//! overlapping, and the stored rotation does not alter collision or bounds
//! geometry.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support for the data
//!   model and configuration types.

pub mod de;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod piece;
pub mod render;
pub mod sheet;

// Re-exports
pub use de::{DeConfig, DeProgress, DeResult, DeRunner};
pub use error::{Error, Result};
pub use geometry::{in_bounds, overlaps};
pub use layout::Layout;
pub use piece::{Piece, PieceId, PieceKind, Rotation};
pub use render::{LayoutRenderer, NoopRenderer};
pub use sheet::Sheet;
