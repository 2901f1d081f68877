//! Image handles produced by a caller-supplied image creator.
//!
//! The engine never decodes images itself. When a tag references an image,
//! the HTML parser hands the resolved URL and an [`ImageHint`] to the
//! creator callback and stores whatever [`LoadedImage`] comes back on the tag.

/// How a referenced image is going to be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageHint {
    /// Inline content (`<img src>`, `<input type=image src>`).
    Inline,
    /// Tiled background (`background` attribute).
    Background,
}

/// Image returned by an image creator.
///
/// Contains the decoded RGBA pixel data and intrinsic dimensions. The pixel
/// buffer may be empty when the creator only knows the dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    /// Intrinsic width of the image in pixels.
    width: u32,
    /// Intrinsic height of the image in pixels.
    height: u32,
    /// Raw RGBA pixel data (width * height * 4 bytes).
    rgba_data: Vec<u8>,
}

impl LoadedImage {
    /// Create a new `LoadedImage` from decoded RGBA pixel data.
    #[must_use]
    pub const fn new(width: u32, height: u32, rgba_data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba_data,
        }
    }

    /// A placeholder that only knows its dimensions.
    #[must_use]
    pub const fn sized(width: u32, height: u32) -> Self {
        Self::new(width, height, Vec::new())
    }

    /// Intrinsic width of the image in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Intrinsic height of the image in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA pixel data.
    #[must_use]
    pub fn rgba_data(&self) -> &[u8] {
        &self.rgba_data
    }
}
