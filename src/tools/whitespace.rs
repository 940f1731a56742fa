/// Result of a whitespace strip: the cleaned text plus how many characters
/// were dropped, which the UI reports next to the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stripped {
    pub output: String,
    pub removed: usize,
}

/// Collapses every whitespace run (spaces, tabs, newlines, any Unicode
/// whitespace) to nothing.
pub fn strip(input: &str) -> Stripped {
    let output: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let removed = input.chars().count() - output.chars().count();
    Stripped { output, removed }
}
