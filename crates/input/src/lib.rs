//! Input: platform-free actions and the per-frame snapshot the core reads.
//!
//! # Invariants
//! - The core only ever sees an `InputSnapshot` value; the driver owns the
//!   tracker and the raw window events.
//! - Held actions persist across snapshots until released; look deltas and
//!   edge-triggered block edits are drained by each snapshot and fire at
//!   most once.

mod action;

pub use action::{Action, InputSnapshot, InputTracker};
