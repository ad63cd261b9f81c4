use std::path::Path;

use image::RgbaImage;

const TEXTURE_SIZE: u32 = 16;

/// Failure to provide the two named textures. The only fallible surface
/// of the backend; surfaced before the frame loop starts.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to read texture {name}: {source}")]
    Io {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode texture {name}: {source}")]
    Decode {
        name: &'static str,
        #[source]
        source: image::ImageError,
    },
}

/// Load `dirt.png` and `wall.png` from `assets_dir`, or generate the
/// built-in procedural pair when no directory is supplied.
pub fn load_pair(assets_dir: Option<&Path>) -> Result<(RgbaImage, RgbaImage), TextureError> {
    match assets_dir {
        Some(dir) => {
            let dirt = load(dir, "dirt.png")?;
            let wall = load(dir, "wall.png")?;
            tracing::info!(dir = %dir.display(), "loaded textures");
            Ok((dirt, wall))
        }
        None => {
            tracing::info!("no assets directory, using procedural textures");
            Ok((procedural_dirt(), procedural_wall()))
        }
    }
}

fn load(dir: &Path, name: &'static str) -> Result<RgbaImage, TextureError> {
    let bytes = std::fs::read(dir.join(name)).map_err(|source| TextureError::Io { name, source })?;
    let img = image::load_from_memory(&bytes)
        .map_err(|source| TextureError::Decode { name, source })?;
    Ok(img.to_rgba8())
}

/// Cheap deterministic per-texel hash for the noise patterns.
fn hash(x: u32, y: u32) -> u32 {
    let mut h = x.wrapping_mul(374_761_393).wrapping_add(y.wrapping_mul(668_265_263));
    h = (h ^ (h >> 13)).wrapping_mul(1_274_126_177);
    h ^ (h >> 16)
}

/// Speckled brown noise.
fn procedural_dirt() -> RgbaImage {
    RgbaImage::from_fn(TEXTURE_SIZE, TEXTURE_SIZE, |x, y| {
        let n = (hash(x, y) % 64) as u8;
        image::Rgba([96 + n, 64 + n / 2, 32 + n / 4, 255])
    })
}

/// Gray bricks in a running bond layout with dark mortar lines.
fn procedural_wall() -> RgbaImage {
    RgbaImage::from_fn(TEXTURE_SIZE, TEXTURE_SIZE, |x, y| {
        let row = y / 4;
        let offset = if row % 2 == 0 { 0 } else { 4 };
        let in_mortar = y % 4 == 0 || (x + offset) % 8 == 0;
        if in_mortar {
            image::Rgba([70, 70, 70, 255])
        } else {
            let n = (hash(x, y) % 24) as u8;
            image::Rgba([150 + n, 140 + n, 130 + n, 255])
        }
    })
}
