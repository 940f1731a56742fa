use super::ToolError;
use serde_json::Value;

/// format
///
/// Parses the input as JSON and pretty-prints it with 2-space indentation.
/// Invalid input yields `ToolError::InvalidJson` carrying the parser's own
/// message (position included), matching the inline feedback the UI shows.
pub fn format(input: &str) -> Result<String, ToolError> {
    let parsed: Value =
        serde_json::from_str(input).map_err(|e| ToolError::InvalidJson(e.to_string()))?;

    // to_string_pretty uses 2-space indentation.
    serde_json::to_string_pretty(&parsed).map_err(|e| ToolError::InvalidJson(e.to_string()))
}
