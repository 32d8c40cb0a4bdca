use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueLaneError {
    /// Unknown queue lane.
    #[error("Unknown queue lane: {}", lane)]
    UnknownQueueLane { lane: String },
}

/// Independent queue partition dedicated to one subscription tier.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Hash, Copy, Clone, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueueLane {
    /// Free tier lane.
    #[default]
    Free,
    /// Pro tier lane.
    Pro,
}

impl QueueLane {
    /// Convert lane to static str.
    pub fn to_str(self) -> &'static str {
        self.into()
    }

    /// All lanes, in scheduling order.
    pub fn all() -> [QueueLane; 2] {
        [Self::Free, Self::Pro]
    }
}

impl Display for QueueLane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for QueueLane {
    type Err = QueueLaneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            e => Err(QueueLaneError::UnknownQueueLane { lane: e.to_string() }),
        }
    }
}

impl From<QueueLane> for &'static str {
    fn from(lane: QueueLane) -> Self {
        match lane {
            QueueLane::Free => "free",
            QueueLane::Pro => "pro",
        }
    }
}
