//! 优惠券仓储
//!
//! 在选择器给出的后端上执行业务操作，负责优惠券码规范化与故障策略：
//! 读路径遇到存储故障时回退到内存存储；写路径直接暴露故障，不做静默回退。

use std::sync::Arc;

use coupon_shared::error::{CouponError, Result};
use coupon_shared::observability::metrics;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::backend::BackendSelector;
use crate::models::{Coupon, canonical_code, normalize_code};
use crate::store::BackendKind;

/// 批量添加结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkAddReport {
    pub added: Vec<String>,
    pub skipped: Vec<String>,
    pub errors: Vec<String>,
}

pub struct CouponRepository {
    selector: Arc<BackendSelector>,
}

impl CouponRepository {
    pub fn new(selector: Arc<BackendSelector>) -> Self {
        Self { selector }
    }

    pub fn selector(&self) -> &Arc<BackendSelector> {
        &self.selector
    }

    /// 列出所有有效优惠券，同时返回实际提供数据的后端
    ///
    /// 持久化存储按 created_at 倒序返回；内存存储不保证顺序。
    /// 持久化存储读取失败时回退到内存存储，故障不向上传播。
    #[instrument(skip(self))]
    pub async fn list_active(&self) -> Result<(Vec<Coupon>, BackendKind)> {
        let backend = self.selector.select().await;
        match backend.store().list_active().await {
            Ok(coupons) => Ok((coupons, backend.kind())),
            Err(e) if backend.kind() == BackendKind::Durable => {
                warn!(error = %e, "Durable list failed, reading from transient store");
                metrics::record_backend_fallback("list");
                let coupons = self.selector.transient().list_active().await?;
                Ok((coupons, BackendKind::Transient))
            }
            Err(e) => Err(e),
        }
    }

    /// 添加优惠券，同码记录（无论是否有效）已存在时返回 `Duplicate`
    #[instrument(skip(self, description))]
    pub async fn add(&self, code: &str, description: Option<&str>) -> Result<Coupon> {
        let code = canonical_code(code)?;
        let backend = self.selector.select().await;
        let coupon = Coupon::new(code.clone(), description.unwrap_or_default());

        match backend.store().insert_if_absent(coupon).await? {
            Some(created) => {
                info!(code = %created.code, source = backend.kind().as_str(), "Coupon added");
                Ok(created)
            }
            None => Err(CouponError::Duplicate { code }),
        }
    }

    /// 软删除优惠券，返回是否找到记录
    #[instrument(skip(self))]
    pub async fn remove(&self, code: &str) -> Result<bool> {
        let code = canonical_code(code)?;
        let backend = self.selector.select().await;
        let removed = backend.store().deactivate(&code).await?;
        if removed {
            info!(code = %code, source = backend.kind().as_str(), "Coupon deactivated");
        }
        Ok(removed)
    }

    /// 批量添加
    ///
    /// 按输入顺序逐条处理，非字符串或空白条目记入 `errors`，
    /// 已存在的记入 `skipped`，不会因单条无效而中止；存储故障中止整个调用。
    #[instrument(skip(self, entries), fields(count = entries.len()))]
    pub async fn bulk_add(&self, entries: &[Value]) -> Result<BulkAddReport> {
        if entries.is_empty() {
            return Err(CouponError::Validation(
                "Codes array is required".to_string(),
            ));
        }

        let backend = self.selector.select().await;
        let store = backend.store();
        let mut report = BulkAddReport::default();

        for entry in entries {
            let code = match entry {
                Value::String(raw) => normalize_code(raw),
                _ => String::new(),
            };
            if code.is_empty() {
                report.errors.push(format!("Invalid code: {}", display_entry(entry)));
                continue;
            }

            match store.insert_if_absent(Coupon::new(code.clone(), "")).await? {
                Some(_) => report.added.push(code),
                None => report.skipped.push(code),
            }
        }

        info!(
            added = report.added.len(),
            skipped = report.skipped.len(),
            errors = report.errors.len(),
            source = backend.kind().as_str(),
            "Bulk add finished"
        );
        Ok(report)
    }
}

/// 条目原样展示：字符串不带引号，其他值使用 JSON 文本
fn display_entry(entry: &Value) -> String {
    match entry {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
