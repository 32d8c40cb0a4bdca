use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReviewTypeError {
    /// Unknown review type.
    #[error("Unknown review type: {}", value)]
    UnknownReviewType { value: String },
}

/// Review depth.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Copy, Clone, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewType {
    /// Summary-only review.
    #[default]
    Basic,
    /// Summary plus structured inline issues and optional auto-fix.
    Full,
}

impl ReviewType {
    /// Convert review type to static str.
    pub fn to_str(self) -> &'static str {
        self.into()
    }
}

impl Display for ReviewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for ReviewType {
    type Err = ReviewTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl TryFrom<&str> for ReviewType {
    type Error = ReviewTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "basic" => Ok(Self::Basic),
            "full" => Ok(Self::Full),
            e => Err(ReviewTypeError::UnknownReviewType {
                value: e.to_string(),
            }),
        }
    }
}

impl TryFrom<&String> for ReviewType {
    type Error = ReviewTypeError;

    fn try_from(value: &String) -> Result<Self, Self::Error> {
        Self::try_from(&value[..])
    }
}

impl From<ReviewType> for &'static str {
    fn from(review_type: ReviewType) -> Self {
        match review_type {
            ReviewType::Basic => "basic",
            ReviewType::Full => "full",
        }
    }
}
