use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::{ApiError, Result};

/// File contents at a git reference.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct GhFileContents {
    /// Path.
    pub path: String,
    /// Blob SHA.
    pub sha: String,
    /// Base64 content, possibly with embedded newlines.
    pub content: String,
}

impl GhFileContents {
    /// Decodes the base64 content into text.
    pub fn decode(&self) -> Result<String> {
        let stripped: String = self
            .content
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();

        let bytes = STANDARD
            .decode(stripped)
            .map_err(|_| ApiError::InvalidFileContents {
                path: self.path.clone(),
            })?;

        String::from_utf8(bytes).map_err(|_| ApiError::InvalidFileContents {
            path: self.path.clone(),
        })
    }

    /// Encodes text into base64 content.
    pub fn encode(text: &str) -> String {
        STANDARD.encode(text.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::GhFileContents;

    #[test]
    fn decode_strips_embedded_newlines() {
        let contents = GhFileContents {
            path: "src/lib.rs".into(),
            sha: "abc".into(),
            content: "aGVsbG8g\nd29ybGQ=\n".into(),
        };

        assert_eq!(contents.decode().unwrap(), "hello world");
    }

    #[test]
    fn decode_rejects_invalid_base64() {
        let contents = GhFileContents {
            path: "src/lib.rs".into(),
            sha: "abc".into(),
            content: "&&&".into(),
        };

        assert!(contents.decode().is_err());
    }

    #[test]
    fn encode_round_trip() {
        let contents = GhFileContents {
            content: GhFileContents::encode("fn main() {}"),
            ..Default::default()
        };

        assert_eq!(contents.decode().unwrap(), "fn main() {}");
    }
}
