//! wgpu render backend for voxrelic.
//!
//! Draws every frame as one instanced pass over a shared unit-cube mesh:
//! each draw call becomes an instance carrying its model matrix, base
//! color, texture blend weight, and texture selector.
//!
//! # Invariants
//! - The cube mesh is built once at renderer construction and shared by
//!   every draw; there is no lazy first-use initialization.
//! - The renderer never mutates world state; it consumes read-only
//!   per-frame parameters.
//! - Texture loading is the only fallible surface and fails before the
//!   frame loop starts.

mod gpu;
mod shaders;
mod textures;

pub use gpu::WgpuRenderer;
pub use textures::TextureError;
