//! Page recompression.
//!
//! Every page is decoded, converted to RGB, shrunk to fit the configured bounds and
//! re-encoded as JPEG before it is embedded.

use std::fs::File;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use memmap2::MmapOptions;

use crate::error::{Error, Result};
use crate::path_utils::path_to_string_lossy;
use crate::types::ImageOptions;

/// MIME type of every recompressed page.
pub const PAGE_MIME: &str = "image/jpeg";

/// A recompressed page ready to be embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Original source file name, e.g. `CH01_001.png`.
    pub source_name: String,
    /// JPEG bytes.
    pub data: Vec<u8>,
}

impl EncodedImage {
    /// Name of the page inside the book: the source stem with a `.jpg` extension.
    pub fn resource_name(&self) -> String {
        page_resource_name(&self.source_name)
    }
}

/// `CH01_001.png` → `CH01_001.jpg`.
pub fn page_resource_name(source_name: &str) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| source_name.to_string());
    format!("{}.jpg", stem)
}

/// Decodes, normalizes and re-encodes one page.
///
/// The source file is memory-mapped only while decoding.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - JPEG bytes no larger than `options.max_width` × `options.max_height`
/// * `Err(Error)` - The file can't be opened or isn't a decodable image
pub fn encode_page(path: &Path, options: &ImageOptions) -> Result<Vec<u8>> {
    let decoded = {
        let file = File::open(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to open image file '{}': {}",
                    path_to_string_lossy(path),
                    e
                ),
            ))
        })?;
        let mmap = unsafe { MmapOptions::new().map(&file)? };
        image::load_from_memory(&mmap)?
    };

    let rgb = match decoded {
        DynamicImage::ImageRgb8(_) => decoded,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    };

    let fitted = fit_within(rgb, options.max_width, options.max_height);

    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, options.jpeg_quality);
    fitted.write_with_encoder(encoder)?;
    Ok(out)
}

/// Shrinks the image to fit within the bounds, keeping its aspect ratio. Never enlarges.
pub fn fit_within(img: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width <= max_width && height <= max_height {
        img
    } else {
        img.resize(max_width, max_height, FilterType::Lanczos3)
    }
}
