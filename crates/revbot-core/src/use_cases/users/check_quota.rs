use async_trait::async_trait;
use revbot_models::{QueueLane, ReviewType, User};
use shaku::{Component, Interface};

use crate::{CoreContext, Result};

/// Admission decision for one incoming event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaDecision {
    pub allowed: bool,
    pub review_type: ReviewType,
    pub lane: QueueLane,
}

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait CheckQuotaInterface: Interface {
    async fn run<'a>(&self, ctx: &CoreContext<'a>, user: &User) -> Result<QuotaDecision>;
}

#[derive(Component)]
#[shaku(interface = CheckQuotaInterface)]
pub(crate) struct CheckQuota;

#[async_trait]
impl CheckQuotaInterface for CheckQuota {
    #[tracing::instrument(skip_all, fields(user_id = user.id, reviews_used = user.reviews_used, reviews_limit = user.reviews_limit), ret)]
    async fn run<'a>(&self, _ctx: &CoreContext<'a>, user: &User) -> Result<QuotaDecision> {
        // The reset timestamp belongs to billing and is never touched here.
        Ok(QuotaDecision {
            allowed: user.reviews_used < user.reviews_limit,
            review_type: user.plan.review_type(),
            lane: user.plan.lane(),
        })
    }
}
