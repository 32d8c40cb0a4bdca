use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Summary used when the model response cannot be parsed.
pub(crate) const FALLBACK_SUMMARY: &str = "Unable to parse review output.";

/// Issue severity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Critical,
    Warning,
    Suggestion,
}

impl IssueSeverity {
    pub fn to_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Suggestion => "suggestion",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Critical => "🔴",
            Self::Warning => "🟡",
            Self::Suggestion => "🔵",
        }
    }

    /// Whether an attached fix should be pushed to the branch.
    pub fn fix_worthy(self) -> bool {
        matches!(self, Self::Critical | Self::Warning)
    }
}

impl Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

/// One issue reported by a full review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewIssue {
    #[serde(default)]
    pub file: String,
    /// Line number on the new side, `0` for file-level issues.
    #[serde(default)]
    pub line: u64,
    pub severity: IssueSeverity,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub fix: Option<String>,
}

/// Structured result of a review generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewOutput {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub issues: Vec<ReviewIssue>,
}

impl ReviewOutput {
    /// Degraded output for unparseable model responses.
    pub fn fallback() -> Self {
        Self {
            summary: FALLBACK_SUMMARY.into(),
            issues: vec![],
        }
    }

    /// Extracts the outermost JSON object from a raw model response.
    ///
    /// Models wrap their JSON in prose or markdown fences; anything before
    /// the first `{` and after the last `}` is discarded. Any parse or
    /// validation failure degrades to [`Self::fallback`], never an error.
    pub fn parse(raw: &str) -> Self {
        let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) else {
            return Self::fallback();
        };
        if start >= end {
            return Self::fallback();
        }

        serde_json::from_str(&raw[start..=end]).unwrap_or_else(|_| Self::fallback())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{IssueSeverity, ReviewOutput};

    #[test]
    fn parse_plain_json() {
        let output = ReviewOutput::parse(
            r#"{"summary": "Looks good", "issues": [
                {"file": "src/lib.rs", "line": 3, "severity": "critical",
                 "category": "security", "message": "SQL injection", "fix": "use binds"}
            ]}"#,
        );

        assert_eq!(output.summary, "Looks good");
        assert_eq!(output.issues.len(), 1);
        assert_eq!(output.issues[0].severity, IssueSeverity::Critical);
        assert_eq!(output.issues[0].fix.as_deref(), Some("use binds"));
    }

    #[test]
    fn parse_json_wrapped_in_markdown_fences() {
        let output = ReviewOutput::parse(
            "Here is the review:\n```json\n{\"summary\": \"ok\", \"issues\": []}\n```\nDone.",
        );

        assert_eq!(output.summary, "ok");
        assert!(output.issues.is_empty());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let output = ReviewOutput::parse(r#"{"issues": [{"severity": "warning"}]}"#);

        assert_eq!(output.summary, "");
        assert_eq!(output.issues[0].line, 0);
        assert_eq!(output.issues[0].file, "");
        assert_eq!(output.issues[0].fix, None);
    }

    #[test]
    fn prose_without_json_degrades_to_fallback() {
        let output = ReviewOutput::parse("I could not produce a review.");

        assert_eq!(output, ReviewOutput::fallback());
        assert!(output.issues.is_empty());
    }

    #[test]
    fn malformed_json_degrades_to_fallback() {
        assert_eq!(
            ReviewOutput::parse(r#"{"summary": "broken", "issues": ["#),
            ReviewOutput::fallback()
        );
    }

    #[test]
    fn unknown_severity_degrades_to_fallback() {
        let output = ReviewOutput::parse(
            r#"{"summary": "s", "issues": [{"severity": "catastrophic"}]}"#,
        );

        assert_eq!(output, ReviewOutput::fallback());
    }
}
