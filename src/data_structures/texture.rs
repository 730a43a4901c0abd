//! Decoded texture images.

use image::GenericImageView;

/// A decoded RGBA texture, keyed by name in the render state's registry.
///
/// The pixel data is kept CPU-side; uploading it is the presenter's job.
#[derive(Clone, Debug)]
pub struct TextureImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    pub fn from_image(name: impl Into<String>, img: &image::DynamicImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            name: name.into(),
            width,
            height,
            rgba: img.to_rgba8().into_raw(),
        }
    }
}
