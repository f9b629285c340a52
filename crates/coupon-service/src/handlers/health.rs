//! 健康检查

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::state::AppState;

const SERVICE_NAME: &str = "coupon-service";

/// 存活探针：服务进程正常即返回 ok
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME
    }))
}

/// 就绪探针
///
/// 持久化存储未连接时报告 degraded，服务仍可用内存存储响应请求
pub async fn readiness_check(State(state): State<AppState>) -> Json<Value> {
    // 未连接时触发一次连接尝试
    let backend = state.selector.select().await;
    let durable_ok = state.selector.is_connected();

    Json(json!({
        "status": if durable_ok { "ok" } else { "degraded" },
        "service": SERVICE_NAME,
        "backend": backend.kind(),
        "checks": {
            "database": if durable_ok { "ok" } else { "fail" }
        }
    }))
}
