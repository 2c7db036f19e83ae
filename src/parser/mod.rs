//! Parser module — dispatch by file extension.

pub mod header;

use crate::model::ParsedHeader;
use anyhow::{anyhow, Result};
use std::path::Path;

/// Extension of test files carrying a structured header.
pub const TEST_FILE_EXTENSION: &str = "tsc";

/// Parse a test file's header based on its extension.
///
/// The outer `Result` rejects unsupported files; the inner one carries the
/// structural verdict for the header itself.
pub fn parse_file(
    path: &Path,
    content: &str,
) -> Result<Result<ParsedHeader, header::HeaderError>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(TEST_FILE_EXTENSION) => Ok(header::parse(content)),
        _ => Err(anyhow!("unsupported file type: {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tsc_files_are_parsed() {
        let parsed = parse_file(
            Path::new("Bogus_Compile_A.tsc"),
            "// Description\n// Input\n// Output\n// Requirements\n",
        )
        .unwrap();
        assert!(parsed.unwrap().is_placeholder());
    }

    #[test]
    fn other_extensions_are_rejected() {
        let err = parse_file(Path::new("notes.txt"), "").unwrap_err();
        assert!(err.to_string().contains("unsupported file type"));
    }
}
