//! 内存存储
//!
//! 使用 DashMap 实现的进程内优惠券存储，持久化存储不可用时作为回退。
//! 进程重启后数据丢失。

use async_trait::async_trait;
use coupon_shared::error::Result;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

use super::CouponStore;
use crate::models::Coupon;

/// 进程内优惠券存储
///
/// 唯一性依赖 DashMap 的分片锁：同一 key 的检查与写入在 entry 持有期间完成。
#[derive(Debug, Clone, Default)]
pub struct TransientCouponStore {
    data: Arc<DashMap<String, Coupon>>,
}

impl TransientCouponStore {
    /// 创建空的内存存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取单条记录（包含已停用的）
    pub fn get(&self, code: &str) -> Option<Coupon> {
        self.data.get(code).map(|v| v.clone())
    }

    /// 记录总数（包含已停用的）
    pub fn count(&self) -> usize {
        self.data.len()
    }

    /// 清空所有数据
    pub fn clear(&self) {
        self.data.clear();
    }
}

#[async_trait]
impl CouponStore for TransientCouponStore {
    /// 返回顺序为哈希表遍历顺序，不保证按创建时间排序
    async fn list_active(&self) -> Result<Vec<Coupon>> {
        Ok(self
            .data
            .iter()
            .filter(|entry| entry.value().is_active)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn insert_if_absent(&self, coupon: Coupon) -> Result<Option<Coupon>> {
        match self.data.entry(coupon.code.clone()) {
            Entry::Occupied(_) => Ok(None),
            Entry::Vacant(slot) => {
                slot.insert(coupon.clone());
                Ok(Some(coupon))
            }
        }
    }

    async fn deactivate(&self, code: &str) -> Result<bool> {
        match self.data.get_mut(code) {
            Some(mut coupon) => {
                coupon.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ensure_active(&self, code: &str) -> Result<bool> {
        match self.data.entry(code.to_string()) {
            Entry::Occupied(mut slot) => {
                let coupon = slot.get_mut();
                if coupon.is_active {
                    Ok(false)
                } else {
                    coupon.is_active = true;
                    Ok(true)
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(Coupon::new(code, ""));
                Ok(true)
            }
        }
    }
}
