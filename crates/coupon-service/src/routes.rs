//! 路由配置模块

use axum::{
    Router, middleware,
    routing::{get, post},
};
use coupon_shared::observability::middleware as obs_middleware;

use crate::{handlers, state::AppState};

/// 构建 /api 下的业务路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/coupons",
            get(handlers::coupon::list_coupons)
                .post(handlers::coupon::add_coupon)
                .delete(handlers::coupon::remove_coupon),
        )
        .route("/coupons/bulk", post(handlers::coupon::bulk_add_coupons))
        .route("/coupons/seed", post(handlers::coupon::seed_coupons))
        .route("/redeem", post(handlers::redeem::redeem_coupon))
}

/// 构建完整应用：业务路由、探针与可观测性中间件
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}
