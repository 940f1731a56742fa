use super::ToolError;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::str::FromStr;

/// CompressedImage
///
/// Outcome of a JPEG recompression: the new bytes plus both sizes, so the
/// caller can present the before/after comparison.
#[derive(Debug, Clone)]
pub struct CompressedImage {
    pub data: Vec<u8>,
    pub original_len: usize,
    pub compressed_len: usize,
}

impl CompressedImage {
    /// Size reduction as a percentage of the original; negative when the
    /// re-encode actually grew the file (possible for already-tiny inputs).
    pub fn savings_percent(&self) -> f64 {
        if self.original_len == 0 {
            return 0.0;
        }
        (self.original_len as f64 - self.compressed_len as f64) / self.original_len as f64
            * 100.0
    }
}

/// compress
///
/// Decodes any supported raster input and re-encodes it as JPEG at the
/// given quality factor (1–100). Alpha is flattened since JPEG has no
/// transparency. A non-image input fails with a user-facing error; nothing
/// here panics.
pub fn compress(bytes: &[u8], quality: u8) -> Result<CompressedImage, ToolError> {
    if quality == 0 || quality > 100 {
        return Err(ToolError::InvalidQuality(quality));
    }

    let decoded =
        image::load_from_memory(bytes).map_err(|e| ToolError::UnreadableImage(e.to_string()))?;

    // JPEG carries no alpha channel.
    let flattened = DynamicImage::ImageRgb8(decoded.to_rgb8());

    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, quality);
    flattened
        .write_with_encoder(encoder)
        .map_err(|e| ToolError::ImageEncode(e.to_string()))?;

    Ok(CompressedImage {
        original_len: bytes.len(),
        compressed_len: out.len(),
        data: out,
    })
}

/// TargetFormat
///
/// The formats the converter can re-encode to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    Png,
    Jpeg,
    WebP,
}

impl TargetFormat {
    /// File extension for the converted download.
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Png => "png",
            TargetFormat::Jpeg => "jpg",
            TargetFormat::WebP => "webp",
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            TargetFormat::Png => ImageFormat::Png,
            TargetFormat::Jpeg => ImageFormat::Jpeg,
            TargetFormat::WebP => ImageFormat::WebP,
        }
    }
}

impl FromStr for TargetFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(TargetFormat::Png),
            "jpg" | "jpeg" => Ok(TargetFormat::Jpeg),
            "webp" => Ok(TargetFormat::WebP),
            other => Err(format!("unsupported target format '{}'", other)),
        }
    }
}

/// convert
///
/// Decodes any supported raster input and re-encodes it in the target
/// format. Pixel layout is adjusted per target: JPEG gets alpha flattened,
/// WebP is normalized to RGBA (the encoder is lossless and takes 8-bit
/// layouts only), PNG takes the decoded image as-is.
pub fn convert(bytes: &[u8], target: TargetFormat) -> Result<Vec<u8>, ToolError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| ToolError::UnreadableImage(e.to_string()))?;

    let prepared = match target {
        TargetFormat::Png => decoded,
        TargetFormat::Jpeg => DynamicImage::ImageRgb8(decoded.to_rgb8()),
        TargetFormat::WebP => DynamicImage::ImageRgba8(decoded.to_rgba8()),
    };

    let mut out = Cursor::new(Vec::new());
    prepared
        .write_to(&mut out, target.image_format())
        .map_err(|e| ToolError::ImageEncode(e.to_string()))?;

    Ok(out.into_inner())
}
