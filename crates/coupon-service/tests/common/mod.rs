//! 集成测试共用的桩实现

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{Router, body::Body, http::Request, http::StatusCode};
use coupon_service::{
    AppState, BackendSelector, Coupon, CouponStore, DurableConnector, RedemptionCoordinator,
    RewardApi, TransientCouponStore, routes,
};
use coupon_shared::error::{CouponError, Result};
use serde_json::Value;
use tower::ServiceExt;

/// 未配置持久化存储
pub struct UnconfiguredConnector;

#[async_trait]
impl DurableConnector for UnconfiguredConnector {
    async fn connect(&self) -> Result<Arc<dyn CouponStore>> {
        Err(CouponError::BackendUnavailable("database url not configured".into()))
    }
}

/// 总是返回给定存储
pub struct FixedConnector(pub Arc<dyn CouponStore>);

#[async_trait]
impl DurableConnector for FixedConnector {
    async fn connect(&self) -> Result<Arc<dyn CouponStore>> {
        Ok(Arc::clone(&self.0))
    }
}

/// 连接成功但每个操作都失败的存储
pub struct FaultyStore;

fn fault() -> CouponError {
    CouponError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl CouponStore for FaultyStore {
    async fn list_active(&self) -> Result<Vec<Coupon>> {
        Err(fault())
    }

    async fn insert_if_absent(&self, _coupon: Coupon) -> Result<Option<Coupon>> {
        Err(fault())
    }

    async fn deactivate(&self, _code: &str) -> Result<bool> {
        Err(fault())
    }

    async fn ensure_active(&self, _code: &str) -> Result<bool> {
        Err(fault())
    }
}

/// 记录调用次数并返回固定响应的奖励服务
pub struct StubRewardApi {
    reply: std::result::Result<Value, String>,
    calls: AtomicUsize,
}

impl StubRewardApi {
    pub fn replying(reply: Value) -> Self {
        Self {
            reply: Ok(reply),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            reply: Err(reason.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RewardApi for StubRewardApi {
    async fn redeem(&self, _player_id: &str, _coupon_code: &str) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .map_err(CouponError::RemoteService)
    }
}

pub struct TestApp {
    pub router: Router,
    pub transient: TransientCouponStore,
}

impl TestApp {
    /// 仅内存存储
    pub fn transient_only(api: Arc<StubRewardApi>) -> Self {
        Self::with_connector(Arc::new(UnconfiguredConnector), api)
    }

    /// 持久化存储可连接但读写都失败
    pub fn faulty_durable(api: Arc<StubRewardApi>) -> Self {
        Self::with_connector(Arc::new(FixedConnector(Arc::new(FaultyStore))), api)
    }

    pub fn with_connector(connector: Arc<dyn DurableConnector>, api: Arc<StubRewardApi>) -> Self {
        let transient = TransientCouponStore::new();
        let selector = Arc::new(BackendSelector::new(connector, Arc::new(transient.clone())));
        let redemption = Arc::new(RedemptionCoordinator::new(api));
        let router = routes::app(AppState::new(selector, redemption));
        Self { router, transient }
    }

    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let body = match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        };
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }
}
