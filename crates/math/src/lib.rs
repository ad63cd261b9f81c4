//! Minimal 3D math for voxrelic: `Vec3` and `Mat4`.
//!
//! Matrices are stored as flat `[f32; 16]` arrays in the column-major
//! order GPU uniform and instance buffers consume, so a finished matrix
//! uploads without transposition. `translate`, `scale`, and `rotate_y`
//! each right-multiply an elementary matrix onto the receiver, so a
//! chain written translate-then-scale applies the scale to local
//! coordinates first and the translation last, the usual model-transform
//! order.
//!
//! # Invariants
//! - Chained transform builders never allocate; everything is `Copy`.
//! - `Vec3::normalized` of a zero vector returns the vector unchanged.
//! - `Mat4::perspective` maps the near plane to clip depth -1 and the far
//!   plane to +1 (GL-style clip volume).

mod mat4;
mod vec3;

pub use mat4::Mat4;
pub use vec3::Vec3;
