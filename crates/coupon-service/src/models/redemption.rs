//! 兑换结果模型
//!
//! 包含对外暴露的兑换状态、单次兑换结果与统一响应信封，
//! 以及外部奖励服务的响应结构。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 兑换状态
///
/// `Pending` 与 `Redeeming` 为客户端进度状态，服务端兑换流程不会产生
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedemptionStatus {
    Success,
    Expired,
    AlreadyUsed,
    Invalid,
    Error,
    Pending,
    Redeeming,
}

impl RedemptionStatus {
    /// 根据奖励服务返回的错误码归类状态
    ///
    /// 24001 与 24002 是两个不同的远端原因，下游依赖同一个 `Invalid` 分桶，保持合并
    pub fn from_error_code(error_code: Option<i64>) -> Self {
        match error_code {
            None | Some(0) => Self::Success,
            Some(24004) => Self::AlreadyUsed,
            Some(24003) => Self::Expired,
            Some(24001) | Some(24002) => Self::Invalid,
            Some(_) => Self::Error,
        }
    }

    /// 状态展示文案
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "สำเร็จ",
            Self::Expired => "หมดอายุ",
            Self::AlreadyUsed => "ใช้แล้ว",
            Self::Invalid => "ไม่ถูกต้อง",
            Self::Error => "ผิดพลาด",
            Self::Pending => "รอดำเนินการ",
            Self::Redeeming => "กำลังแลก...",
        }
    }

    /// 序列化名称（用于日志与指标标签）
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Expired => "expired",
            Self::AlreadyUsed => "already_used",
            Self::Invalid => "invalid",
            Self::Error => "error",
            Self::Pending => "pending",
            Self::Redeeming => "redeeming",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// 单次兑换结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionResult {
    pub code: String,
    pub status: RedemptionStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
}

/// 奖励服务响应
///
/// 所有字段均可缺省；成功时通常只带 `result`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRedeemResponse {
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub error_cause: Option<String>,
    #[serde(default)]
    pub http_status: Option<i64>,
    #[serde(default)]
    pub result: Option<RewardResult>,
}

/// 奖励发放明细
///
/// 条目结构不做约束，只用于计数；状态只由 `error_code` 决定
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardResult {
    #[serde(default)]
    pub reward_items: Option<Vec<Value>>,
}

/// 兑换失败类别（仅供 HTTP 层选择状态码，不序列化）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedemptionFailure {
    /// 入参校验失败，未发起远端调用
    Validation,
    /// 远端调用失败或响应无法解析
    RemoteService,
}

/// 兑换响应信封
///
/// 无论成功与否都返回同一结构；远端原始响应原样保留在 `raw_response`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionEnvelope {
    pub success: bool,
    pub result: RedemptionResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub failure: Option<RedemptionFailure>,
}

impl RedemptionEnvelope {
    /// 远端给出了可解析的响应
    pub fn completed(result: RedemptionResult, raw_response: Value) -> Self {
        Self {
            success: result.status.is_success(),
            result,
            raw_response: Some(raw_response),
            error: None,
            failure: None,
        }
    }

    /// 失败结果，状态固定为 `Error`
    pub fn failed(
        failure: RedemptionFailure,
        code: impl Into<String>,
        message: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            result: RedemptionResult {
                code: code.into(),
                status: RedemptionStatus::Error,
                message: message.into(),
                error_code: None,
            },
            raw_response: None,
            error: Some(error.into()),
            failure: Some(failure),
        }
    }

    /// 附带无法解析的原始响应
    pub fn with_raw_response(mut self, raw_response: Value) -> Self {
        self.raw_response = Some(raw_response);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_code_table() {
        let cases = [
            (None, RedemptionStatus::Success),
            (Some(0), RedemptionStatus::Success),
            (Some(24004), RedemptionStatus::AlreadyUsed),
            (Some(24003), RedemptionStatus::Expired),
            (Some(24001), RedemptionStatus::Invalid),
            (Some(24002), RedemptionStatus::Invalid),
            (Some(9999), RedemptionStatus::Error),
            (Some(-1), RedemptionStatus::Error),
        ];

        for (code, expected) in cases {
            assert_eq!(
                RedemptionStatus::from_error_code(code),
                expected,
                "errorCode={code:?}"
            );
        }
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_value(RedemptionStatus::AlreadyUsed).unwrap(),
            json!("already_used")
        );
        for status in [
            RedemptionStatus::Success,
            RedemptionStatus::Expired,
            RedemptionStatus::Invalid,
            RedemptionStatus::Error,
            RedemptionStatus::Pending,
            RedemptionStatus::Redeeming,
        ] {
            assert_eq!(serde_json::to_value(status).unwrap(), json!(status.as_str()));
            assert!(!status.label().is_empty());
        }
    }

    #[test]
    fn test_remote_response_all_fields_optional() {
        let parsed: RemoteRedeemResponse = serde_json::from_value(json!({})).unwrap();
        assert!(parsed.error_code.is_none());

        let parsed: RemoteRedeemResponse = serde_json::from_value(json!({
            "errorCode": 24004,
            "errorMessage": "exceeded",
            "errorCause": null,
            "httpStatus": 400
        }))
        .unwrap();
        assert_eq!(parsed.error_code, Some(24004));
        assert!(parsed.error_cause.is_none());
    }

    #[test]
    fn test_envelope_omits_internal_failure_kind() {
        let envelope = RedemptionEnvelope::failed(
            RedemptionFailure::Validation,
            "",
            "PID is required",
            "PID is required",
        );
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["result"]["status"], "error");
        assert!(json.get("failure").is_none());
        assert!(json["result"].get("errorCode").is_none());
    }
}
