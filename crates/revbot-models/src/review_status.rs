use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReviewStatusError {
    /// Unknown review status.
    #[error("Unknown review status: {}", status)]
    UnknownReviewStatus { status: String },
}

/// Review lifecycle status.
///
/// Transitions are monotonic: `pending → queued → processing → {completed,
/// failed}`. Terminal states never transition further; a failed review is
/// only retried by a brand-new webhook event.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Copy, Clone, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// Created, not yet queued.
    #[default]
    Pending,
    /// Waiting on a queue lane.
    Queued,
    /// Picked up by a worker.
    Processing,
    /// Finished with a published result.
    Completed,
    /// Finished with an error.
    Failed,
}

impl ReviewStatus {
    /// Convert review status to static str.
    pub fn to_str(self) -> &'static str {
        self.into()
    }

    /// Whether the status accepts no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether a forward transition to `next` is allowed.
    pub fn can_transition_to(self, next: ReviewStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Queued)
                | (Self::Queued, Self::Processing)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Failed)
        )
    }
}

impl Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = ReviewStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl TryFrom<&str> for ReviewStatus {
    type Error = ReviewStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "queued" => Ok(Self::Queued),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            e => Err(ReviewStatusError::UnknownReviewStatus {
                status: e.to_string(),
            }),
        }
    }
}

impl TryFrom<&String> for ReviewStatus {
    type Error = ReviewStatusError;

    fn try_from(value: &String) -> Result<Self, Self::Error> {
        Self::try_from(&value[..])
    }
}

impl From<ReviewStatus> for &'static str {
    fn from(status: ReviewStatus) -> Self {
        match status {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Queued => "queued",
            ReviewStatus::Processing => "processing",
            ReviewStatus::Completed => "completed",
            ReviewStatus::Failed => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ReviewStatus;

    #[test]
    fn forward_transitions() {
        assert!(ReviewStatus::Pending.can_transition_to(ReviewStatus::Queued));
        assert!(ReviewStatus::Queued.can_transition_to(ReviewStatus::Processing));
        assert!(ReviewStatus::Processing.can_transition_to(ReviewStatus::Completed));
        assert!(ReviewStatus::Processing.can_transition_to(ReviewStatus::Failed));
    }

    #[test]
    fn terminal_states_never_transition() {
        for next in [
            ReviewStatus::Pending,
            ReviewStatus::Queued,
            ReviewStatus::Processing,
            ReviewStatus::Completed,
            ReviewStatus::Failed,
        ] {
            assert!(!ReviewStatus::Completed.can_transition_to(next));
            assert!(!ReviewStatus::Failed.can_transition_to(next));
        }
    }

    #[test]
    fn no_backward_or_skipping_transitions() {
        assert!(!ReviewStatus::Pending.can_transition_to(ReviewStatus::Processing));
        assert!(!ReviewStatus::Queued.can_transition_to(ReviewStatus::Completed));
        assert!(!ReviewStatus::Processing.can_transition_to(ReviewStatus::Queued));
    }
}
