//! 请求体定义

use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

/// 添加优惠券请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddCouponRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Coupon code is required"))]
    pub code: String,
    pub description: Option<String>,
}

/// 删除优惠券请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCouponRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Coupon code is required"))]
    pub code: String,
}

/// 批量添加请求
///
/// 条目类型不做约束，逐条在仓储层分类
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkAddRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Codes array is required"))]
    pub codes: Vec<Value>,
}

/// 兑换请求
///
/// 字段缺失或不是字符串时按空字符串处理，由兑换流程给出校验失败
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    #[serde(default)]
    pub pid: Option<Value>,
    #[serde(default)]
    pub coupon_code: Option<Value>,
}

impl RedeemRequest {
    pub fn pid(&self) -> &str {
        text_field(&self.pid)
    }

    pub fn coupon_code(&self) -> &str {
        text_field(&self.coupon_code)
    }
}

fn text_field(value: &Option<Value>) -> &str {
    value.as_ref().and_then(Value::as_str).unwrap_or_default()
}
