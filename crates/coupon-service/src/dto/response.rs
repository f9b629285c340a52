//! 响应体定义

use serde::Serialize;

use crate::models::Coupon;
use crate::store::BackendKind;

/// API 统一响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self::success_with_message(data, "操作成功")
    }

    /// 创建带摘要信息的成功响应
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: message.into(),
            data: Some(data),
        }
    }
}

/// 有效优惠券列表
#[derive(Debug, Serialize)]
pub struct CouponListData {
    pub coupons: Vec<Coupon>,
    pub source: BackendKind,
}

#[derive(Debug, Serialize)]
pub struct RemovedData {
    pub removed: bool,
}

/// 种子写入结果
#[derive(Debug, Serialize)]
pub struct SeedData {
    pub added: Vec<String>,
    pub skipped: Vec<String>,
    pub source: BackendKind,
    pub fallback: bool,
}
