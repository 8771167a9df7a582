// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — turns rendered page bitmaps into the encoded bytes the
// output builders embed. Operates on in-memory images using the `image` crate.

use image::{DynamicImage, ImageFormat};
use pagegrid_core::error::{PageGridError, Result};
use tracing::{debug, instrument};

use crate::render::PageImage;

/// An encoded raster ready to be embedded in an output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// PNG file bytes.
    pub png: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
    pub dpi: u32,
}

/// Wraps a single in-memory image on its way to an output document.
pub struct ImageProcessor {
    image: DynamicImage,
    dpi: u32,
}

impl ImageProcessor {
    /// Take ownership of a rendered page.
    pub fn from_page(page: PageImage) -> Self {
        Self {
            image: DynamicImage::ImageRgb8(page.pixels),
            dpi: page.dpi,
        }
    }

    /// Create a processor from raw encoded bytes (PNG, JPEG, ...).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8], dpi: u32) -> Result<Self> {
        let image = image::load_from_memory(data)
            .map_err(|err| PageGridError::ImageError(format!("failed to decode image: {}", err)))?;
        debug!(
            width = image.width(),
            height = image.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image, dpi })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        encode_to_format(&self.image, ImageFormat::Png)
    }

    /// Encode as PNG, keeping the pixel dimensions alongside the bytes.
    #[instrument(skip(self), fields(width = self.width(), height = self.height()))]
    pub fn encode(&self) -> Result<EncodedImage> {
        let png = self.to_png_bytes()?;
        debug!(png_bytes = png.len(), "Page encoded");
        Ok(EncodedImage {
            png,
            width_px: self.width(),
            height_px: self.height(),
            dpi: self.dpi,
        })
    }
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, format)
        .map_err(|err| PageGridError::ImageError(format!("image encoding failed: {}", err)))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;

    #[test]
    fn encode_produces_png_with_dimensions() {
        let page = PageImage::new(0, RgbImage::from_pixel(8, 5, Rgb([10, 20, 30])));
        let encoded = ImageProcessor::from_page(page).encode().expect("encode");

        assert_eq!(&encoded.png[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!((encoded.width_px, encoded.height_px), (8, 5));
        assert_eq!(encoded.dpi, 300);
    }

    #[test]
    fn png_bytes_decode_back_to_same_size() {
        let page = PageImage::new(0, RgbImage::new(13, 7));
        let png = ImageProcessor::from_page(page).to_png_bytes().expect("png");
        let decoded = ImageProcessor::from_bytes(&png, 300).expect("decode");
        assert_eq!((decoded.width(), decoded.height()), (13, 7));
    }

    #[test]
    fn invalid_bytes_are_an_image_error() {
        assert!(matches!(
            ImageProcessor::from_bytes(b"nope", 300),
            Err(PageGridError::ImageError(_))
        ));
    }
}
