//! 优惠券存储
//!
//! `CouponStore` 是持久化存储与内存存储共同实现的能力接口。
//! 所有入参 `code` 均为规范化后的优惠券码，规范化由仓储层负责。

mod memory_store;
mod pg_store;

pub use memory_store::TransientCouponStore;
pub use pg_store::PgCouponStore;

use async_trait::async_trait;
use coupon_shared::error::Result;
use serde::{Deserialize, Serialize};

use crate::models::Coupon;

/// 存储后端类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// 持久化存储（PostgreSQL）
    Durable,
    /// 进程内存储
    Transient,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Durable => "durable",
            Self::Transient => "transient",
        }
    }
}

/// 优惠券存储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CouponStore: Send + Sync {
    /// 列出所有有效优惠券，排序由具体实现决定
    async fn list_active(&self) -> Result<Vec<Coupon>>;

    /// 不存在同码记录（无论是否有效）时插入，返回 None 表示已存在
    ///
    /// 检查与插入必须是同一个原子步骤
    async fn insert_if_absent(&self, coupon: Coupon) -> Result<Option<Coupon>>;

    /// 软删除，返回是否找到记录
    async fn deactivate(&self, code: &str) -> Result<bool>;

    /// 确保优惠券处于有效状态
    ///
    /// 不存在时插入，已停用时重新启用（保留原 created_at 与 description），
    /// 返回 true；已经有效时不做任何修改并返回 false
    async fn ensure_active(&self, code: &str) -> Result<bool>;
}
