//! World: authoritative voxel grid, relic/portal game state, and the
//! per-frame draw list.
//!
//! # Invariants
//! - All border cells of the grid sit at the maximum height; the world is
//!   walled.
//! - The flat block list is rebuilt from scratch after every height
//!   mutation and exactly matches the set of occupied cells implied by the
//!   grid. Nothing ever patches it incrementally.
//! - Relic collection counts and the win flag only ever move forward.
//!   `relics_collected` never exceeds the total and `has_won` never
//!   reverts.
//! - The world is the sole mutator of its grid and game state.

mod world;

pub use world::{Block, Relic, World, CULL_RADIUS, GRID_SIZE, MAX_HEIGHT};
