//! Shared vocabulary: the tile coordinate and color types every other
//! crate speaks.
//!
//! # Invariants
//! - A `TileCoord` always comes from flooring world-space coordinates, so
//!   the camera's cell-in-front query and the world's player-tile sampling
//!   agree on which tile a point belongs to.

mod types;

pub use types::{Color, TileCoord};
