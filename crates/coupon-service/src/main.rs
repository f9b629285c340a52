//! 优惠券中继服务
//!
//! 提供优惠券目录管理与兑换转发 REST API。

use std::sync::Arc;

use axum::http::HeaderValue;
use coupon_service::{
    AppState, BackendSelector, HttpRewardClient, PgConnector, RedemptionCoordinator, SeedManager,
    TransientCouponStore, routes,
};
use coupon_shared::{config::AppConfig, observability};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

const SERVICE_NAME: &str = "coupon-service";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load(SERVICE_NAME).unwrap_or_default();

    let obs_config = config
        .observability
        .clone()
        .with_service_name(SERVICE_NAME);
    let _guard = observability::init(&obs_config).await?;

    info!("Starting {} on {}", SERVICE_NAME, config.server_addr());

    let transient = TransientCouponStore::new();
    if config.transient.preload_defaults {
        let report = SeedManager::new().seed(&transient).await?;
        info!(added = report.added.len(), "Transient store preloaded with default coupons");
    }

    // 持久化存储延迟到首次请求时连接，连接失败不阻止服务启动
    if config.database.url.is_none() {
        warn!("DATABASE_URL not configured, serving from transient store only");
    }
    let selector = Arc::new(BackendSelector::new(
        Arc::new(PgConnector::new(config.database.clone())),
        Arc::new(transient),
    ));

    let reward_client = HttpRewardClient::new(&config.reward_api)?;
    info!(url = %reward_client.base_url(), "Reward API client ready");
    let redemption = Arc::new(RedemptionCoordinator::new(Arc::new(reward_client)));

    let state = AppState::new(selector, redemption);
    let app = routes::app(state).layer(cors_layer(config.is_production()));

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// CORS 配置：通过 COUPON_CORS_ORIGINS 环境变量控制允许的来源
fn cors_layer(production: bool) -> CorsLayer {
    let allowed_origins = std::env::var("COUPON_CORS_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:5173".to_string());

    if allowed_origins == "*" {
        if production {
            warn!("COUPON_CORS_ORIGINS=\"*\" 在生产环境中不安全，请设置为具体域名");
        }
        info!("CORS allowed_origins: * (all origins)");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        info!("CORS allowed_origins: {}", allowed_origins);
        let origins: Vec<_> = allowed_origins
            .split(',')
            .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// 监听关闭信号
///
/// 收到 SIGTERM 或 Ctrl+C 后返回，触发 axum 的优雅关闭流程
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "注册 Ctrl+C 处理器失败");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "注册 SIGTERM 处理器失败");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}
