use serde::{Deserialize, Serialize};

/// User-defined review rule, enforced by full reviews when active.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewRule {
    pub id: u64,
    pub user_id: u64,
    pub rule: String,
    pub is_active: bool,
}
