use actix_web::{http::StatusCode, web, HttpResponse, Responder};

use crate::server::AppContext;

pub async fn health_check_route(ctx: web::Data<AppContext>) -> impl Responder {
    let pg_status = ctx.db_service.health_check().await.is_ok();
    let queue_status = ctx.queue_service.health_check().await.is_ok();
    let all_good = pg_status && queue_status;
    let status_code = if all_good {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    HttpResponse::build(status_code).json(serde_json::json!({
        "postgresql": pg_status,
        "redis": queue_status,
    }))
}
