use serde::{Deserialize, Serialize};

/// RGBA color, components in 0..=1.
pub type Color = [f32; 4];

/// One (x, z) integer cell of the world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub z: i32,
}

impl TileCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The tile containing the world-space point `(x, _, z)`.
    ///
    /// Floors toward negative infinity, so points just outside the grid on
    /// the negative side land on tile -1, not tile 0.
    pub fn at(x: f32, z: f32) -> Self {
        Self {
            x: x.floor() as i32,
            z: z.floor() as i32,
        }
    }
}
