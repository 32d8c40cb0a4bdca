//! Pull webhook handlers.

use actix_web::{web, HttpResponse};
use revbot_core::use_cases::pulls::ProcessPullRequestEventInterface;
use revbot_ghapi_interface::types::GhPullRequestEvent;
use shaku::HasComponent;

use super::parse_event_type;
use crate::{event_type::EventType, server::AppContext, Result, ServerError};

pub(crate) fn parse_pull_request_event(body: &str) -> Result<GhPullRequestEvent> {
    parse_event_type(EventType::PullRequest, body)
}

#[tracing::instrument(skip_all, fields(
    action = %event.action,
    repo_path = event.repository.full_name,
    pr_number = event.pull_request.number,
))]
pub(crate) async fn pull_request_event(
    ctx: web::Data<AppContext>,
    event: GhPullRequestEvent,
) -> Result<HttpResponse> {
    let core_ctx = ctx.as_core_context();

    let process_pull_request_event: &dyn ProcessPullRequestEventInterface =
        core_ctx.core_module.resolve_ref();
    let review = process_pull_request_event
        .run(&core_ctx, event)
        .await
        .map_err(|e| ServerError::DomainError { source: e })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "review_id": review.map(|r| r.id),
    })))
}
