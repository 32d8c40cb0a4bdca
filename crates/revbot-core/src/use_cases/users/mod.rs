pub(crate) mod check_quota;

pub use check_quota::{CheckQuotaInterface, QuotaDecision};

#[cfg(any(test, feature = "testkit"))]
pub use check_quota::MockCheckQuotaInterface;
