use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{QueueLane, ReviewType};

#[derive(Debug, Error)]
pub enum PlanTierError {
    /// Unknown plan tier.
    #[error("Unknown plan tier: {}", tier)]
    UnknownPlanTier { tier: String },
}

/// Subscription tier.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Copy, Clone, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    /// Free plan.
    #[default]
    Free,
    /// Pro plan.
    Pro,
}

impl PlanTier {
    /// Convert plan tier to static str.
    pub fn to_str(self) -> &'static str {
        self.into()
    }

    /// Review depth granted by the plan.
    pub fn review_type(self) -> ReviewType {
        match self {
            Self::Free => ReviewType::Basic,
            Self::Pro => ReviewType::Full,
        }
    }

    /// Queue lane bound to the plan.
    pub fn lane(self) -> QueueLane {
        match self {
            Self::Free => QueueLane::Free,
            Self::Pro => QueueLane::Pro,
        }
    }
}

impl Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for PlanTier {
    type Err = PlanTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl TryFrom<&str> for PlanTier {
    type Error = PlanTierError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            e => Err(PlanTierError::UnknownPlanTier {
                tier: e.to_string(),
            }),
        }
    }
}

impl TryFrom<&String> for PlanTier {
    type Error = PlanTierError;

    fn try_from(value: &String) -> Result<Self, Self::Error> {
        Self::try_from(&value[..])
    }
}

impl From<PlanTier> for &'static str {
    fn from(tier: PlanTier) -> Self {
        match tier {
            PlanTier::Free => "free",
            PlanTier::Pro => "pro",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PlanTier;
    use crate::{QueueLane, ReviewType};

    #[test]
    fn tier_mapping() {
        assert_eq!(PlanTier::Free.review_type(), ReviewType::Basic);
        assert_eq!(PlanTier::Pro.review_type(), ReviewType::Full);
        assert_eq!(PlanTier::Free.lane(), QueueLane::Free);
        assert_eq!(PlanTier::Pro.lane(), QueueLane::Pro);
    }
}
