use super::ToolError;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;

/// DecodedToken
///
/// The readable halves of a JWT: header and payload, each pretty-printed
/// JSON. The signature segment is deliberately left alone: this tool
/// inspects tokens, it does not verify them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedToken {
    pub header: String,
    pub payload: String,
}

/// decode
///
/// Splits the token on `.` and decodes the first two segments. Anything
/// other than exactly 3 segments is a format error; a segment that is not
/// base64url-encoded JSON is a segment error. Either way the result is an
/// error with no partial output.
pub fn decode(token: &str) -> Result<DecodedToken, ToolError> {
    let parts: Vec<&str> = token.trim().split('.').collect();
    if parts.len() != 3 {
        return Err(ToolError::MalformedToken);
    }

    let header = decode_segment(parts[0], "header")?;
    let payload = decode_segment(parts[1], "payload")?;

    Ok(DecodedToken { header, payload })
}

fn decode_segment(segment: &str, name: &'static str) -> Result<String, ToolError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| ToolError::InvalidSegment(name))?;

    let text = String::from_utf8(bytes).map_err(|_| ToolError::InvalidSegment(name))?;

    let value: Value =
        serde_json::from_str(&text).map_err(|_| ToolError::InvalidSegment(name))?;

    serde_json::to_string_pretty(&value).map_err(|_| ToolError::InvalidSegment(name))
}
