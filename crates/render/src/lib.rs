//! Rendering Adapter: the renderer-agnostic draw-call contract.
//!
//! # Invariants
//! - A renderer never mutates world state; it consumes per-frame matrices
//!   and a slice of by-value draw records.
//! - Each `DrawCall` is self-contained. There is no mutable current
//!   transform or material shared between successive draws.
//!
//! The wgpu backend lives in its own crate because it needs a device,
//! queue, and surface per call; `TextRenderer` implements the trait here
//! so the CLI and tests can render frames headlessly.

mod renderer;

pub use renderer::{DrawCall, Renderer, TextRenderer, TextureId};
