//! First-person camera: owns the eye pose, derives the forward/right basis
//! from yaw and pitch, and produces the view and projection matrices.
//!
//! # Invariants
//! - Pitch is clamped to [-89, 89] degrees after every look, so the view
//!   direction never reaches the up axis and `Mat4::look_at` never sees its
//!   degenerate parallel case.
//! - The forward/right basis is recomputed on every yaw or pitch change;
//!   movement and the cell-in-front query always read a current basis.
//! - Movement is unconstrained by world geometry.

mod camera;

pub use camera::Camera;
