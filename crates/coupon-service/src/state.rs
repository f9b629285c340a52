//! 应用状态定义

use std::sync::Arc;

use crate::backend::BackendSelector;
use crate::redemption::RedemptionCoordinator;
use crate::repository::CouponRepository;
use crate::seed::SeedManager;

/// Axum 应用共享状态
#[derive(Clone)]
pub struct AppState {
    pub selector: Arc<BackendSelector>,
    pub repository: Arc<CouponRepository>,
    pub seeder: SeedManager,
    pub redemption: Arc<RedemptionCoordinator>,
}

impl AppState {
    /// 由选择器与兑换流程组装状态，仓储共享同一个选择器
    pub fn new(selector: Arc<BackendSelector>, redemption: Arc<RedemptionCoordinator>) -> Self {
        Self {
            repository: Arc::new(CouponRepository::new(Arc::clone(&selector))),
            selector,
            seeder: SeedManager::new(),
            redemption,
        }
    }
}
