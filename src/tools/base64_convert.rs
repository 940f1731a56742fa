use super::ToolError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Encodes text with the standard Base64 alphabet (padded): the `btoa`
/// counterpart. Infallible for any UTF-8 input.
pub fn encode(input: &str) -> String {
    STANDARD.encode(input.as_bytes())
}

/// decode
///
/// Decodes standard-alphabet Base64 back to text: the `atob` counterpart.
/// Two distinct failures: the input is not Base64 at all, or it decodes to
/// bytes that are not valid text. Both are reported inline, never thrown.
pub fn decode(input: &str) -> Result<String, ToolError> {
    let bytes = STANDARD
        .decode(input.trim())
        .map_err(|_| ToolError::InvalidBase64)?;

    String::from_utf8(bytes).map_err(|_| ToolError::NotText)
}
