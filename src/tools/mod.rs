//! Utility tool modules.
//!
//! A family of independent, stateless transforms. Each tool is a pure
//! function: input in, output or a `ToolError` out. No tool shares state
//! with another, none touches the session, and malformed input always
//! produces an error value, never a panic and never partial output.

pub mod base64_convert;
pub mod image_tools;
pub mod json_format;
pub mod jwt_decode;
pub mod uuid_gen;
pub mod whitespace;

use thiserror::Error;

/// ToolError
///
/// Per-tool input failures, with messages written for direct display to the
/// user (the original rendered them as inline form errors).
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("conversion failed: input is not valid Base64")]
    InvalidBase64,

    #[error("conversion failed: decoded data is not valid text")]
    NotText,

    #[error("invalid JWT format: a token must contain exactly 3 dot-separated segments")]
    MalformedToken,

    #[error("invalid JWT {0} segment")]
    InvalidSegment(&'static str),

    #[error("compression quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),

    #[error("could not read the file as an image: {0}")]
    UnreadableImage(String),

    #[error("image re-encoding failed: {0}")]
    ImageEncode(String),
}
