use serde::{Deserialize, Serialize};

/// Inline review comment, anchored on the new side of the diff.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GhReviewComment {
    /// Path.
    pub path: String,
    /// Line number on the new side.
    pub line: u64,
    /// Diff side.
    pub side: String,
    /// Body.
    pub body: String,
}

impl GhReviewComment {
    /// Builds a comment anchored on the `RIGHT` side of the diff.
    pub fn on_right_side(path: &str, line: u64, body: &str) -> Self {
        Self {
            path: path.into(),
            line,
            side: "RIGHT".into(),
            body: body.into(),
        }
    }
}
