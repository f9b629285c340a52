//! 优惠券模型

use chrono::{DateTime, Utc};
use coupon_shared::error::{CouponError, Result};
use serde::{Deserialize, Serialize};

/// 优惠券
///
/// `code` 始终为规范化形式（去除首尾空白并转大写），同一存储内唯一。
/// 删除为软删除：`is_active` 置为 false，记录保留用于后续重复校验。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Coupon {
    /// 以当前时间创建一张有效的优惠券
    ///
    /// 调用方需保证 `code` 已规范化
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            created_at: Utc::now(),
            is_active: true,
        }
    }
}

/// 规范化优惠券码：去除首尾空白并转为大写
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// 规范化并校验优惠券码非空
pub fn canonical_code(raw: &str) -> Result<String> {
    let code = normalize_code(raw);
    if code.is_empty() {
        return Err(CouponError::Validation("Coupon code is required".to_string()));
    }
    Ok(code)
}
