//! Texture decoding.

use anyhow::{Context, Result};

use crate::data_structures::texture::TextureImage;

/// Load and decode a texture file (TIFF in the shipped assets).
///
/// `flip_vertical` mirrors the image rows, for sources whose origin is the
/// top-left corner.
pub fn load_texture(name: &str, path: &str, flip_vertical: bool) -> Result<TextureImage> {
    let data = super::load_binary(path)?;
    decode(name, &data, flip_vertical)
}

/// Decode texture data already in memory.
pub fn decode(name: &str, bytes: &[u8], flip_vertical: bool) -> Result<TextureImage> {
    let img = image::load_from_memory(bytes).with_context(|| format!("decoding texture {name}"))?;
    let img = if flip_vertical { img.flipv() } else { img };
    Ok(TextureImage::from_image(name, &img))
}
