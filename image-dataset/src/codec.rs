//! Image decoding into owned RGBA buffers.

use crate::common::*;

/// The error reported by an [ImageCodec].
pub type CodecError = Box<dyn std::error::Error + Send + Sync>;

/// Decoded pixels in interleaved RGBA order, one byte per component.
///
/// The buffer is owned by whoever decoded it and released on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl DecodedImage {
    /// Number of interleaved components per pixel.
    pub const CHANNELS: usize = 4;

    pub fn from_rgba(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self, CodecError> {
        if width == 0 || height == 0 {
            return Err(format!("image size {}x{} is empty", width, height).into());
        }
        let expect_len = width * height * Self::CHANNELS;
        if pixels.len() != expect_len {
            return Err(format!(
                "expect {} bytes for a {}x{} RGBA image, but get {}",
                expect_len,
                width,
                height,
                pixels.len()
            )
            .into());
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> HW<usize> {
        HW::from_hw([self.height, self.width])
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The RGBA components at column `x` and row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let offset = (y * self.width + x) * Self::CHANNELS;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[offset..offset + Self::CHANNELS]);
        rgba
    }
}

/// Turns an encoded image file into a [DecodedImage].
pub trait ImageCodec
where
    Self: Debug + Send + Sync,
{
    fn decode(&self, path: &Path) -> Result<DecodedImage, CodecError>;
}

/// The codec backed by the `image` crate. The file format is guessed from the
/// file content.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateCodec;

impl ImageCodec for ImageCrateCodec {
    fn decode(&self, path: &Path) -> Result<DecodedImage, CodecError> {
        let image = image::io::Reader::open(path)?
            .with_guessed_format()?
            .decode()?
            .to_rgba8();
        let (width, height) = image.dimensions();
        DecodedImage::from_rgba(width as usize, height as usize, image.into_raw())
    }
}
