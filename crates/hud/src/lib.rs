//! HUD: the per-frame telemetry payload and FPS smoothing.
//!
//! # Invariants
//! - `HudStatus` is a read-only snapshot gathered once per frame; it never
//!   holds references into camera or world state.

mod status;

pub use status::{FpsCounter, HudStatus};
