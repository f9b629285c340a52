//! HTTP 边界错误
//!
//! 把存储与请求层错误映射为状态码和统一响应体

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use coupon_shared::error::CouponError;
use serde_json::json;

const GENERIC_MESSAGE: &str = "服务内部错误，请稍后重试";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("参数验证失败: {0}")]
    Validation(String),
    #[error("优惠券已存在: {0}")]
    DuplicateCoupon(String),
    #[error("优惠券不存在: {0}")]
    CouponNotFound(String),

    // 系统错误
    #[error("存储不可用: {0}")]
    Storage(String),
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
    #[error("内部错误: {0}")]
    Internal(String),
}

impl ApiError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::DuplicateCoupon(_) => StatusCode::CONFLICT,
            Self::CouponNotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) | Self::Database(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::DuplicateCoupon(_) => "DUPLICATE_COUPON",
            Self::CouponNotFound(_) => "COUPON_NOT_FOUND",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只记录日志，响应返回通用提示
        let message = match &self {
            Self::Storage(e) => {
                tracing::error!(error = %e, "存储不可用");
                GENERIC_MESSAGE.to_string()
            }
            Self::Database(e) => {
                tracing::error!(error = %e, "数据库操作失败");
                GENERIC_MESSAGE.to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                GENERIC_MESSAGE.to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<CouponError> for ApiError {
    fn from(err: CouponError) -> Self {
        match err {
            CouponError::Validation(msg) => Self::Validation(msg),
            CouponError::Duplicate { code } => Self::DuplicateCoupon(code),
            CouponError::NotFound { code } => Self::CouponNotFound(code),
            CouponError::Database(e) => Self::Database(e),
            CouponError::BackendUnavailable(msg) => Self::Storage(msg),
            CouponError::Migration(e) => Self::Storage(e.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// 请求体不是合法 JSON 或字段类型不符
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn all_error_variants() -> Vec<(ApiError, StatusCode, &'static str)> {
        vec![
            (ApiError::Validation("code".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (ApiError::DuplicateCoupon("ABC".into()), StatusCode::CONFLICT, "DUPLICATE_COUPON"),
            (ApiError::CouponNotFound("ABC".into()), StatusCode::NOT_FOUND, "COUPON_NOT_FOUND"),
            (ApiError::Storage("down".into()), StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            (
                ApiError::Database(sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
            ),
            (ApiError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        ]
    }

    #[test]
    fn test_all_variants_status_and_code() {
        for (error, expected_status, expected_code) in all_error_variants() {
            assert_eq!(error.status_code(), expected_status, "variant={expected_code}");
            assert_eq!(error.error_code(), expected_code);
        }
    }

    #[test]
    fn test_from_coupon_error() {
        let cases = [
            (CouponError::Validation("x".into()), "VALIDATION_ERROR"),
            (CouponError::Duplicate { code: "A".into() }, "DUPLICATE_COUPON"),
            (CouponError::NotFound { code: "A".into() }, "COUPON_NOT_FOUND"),
            (CouponError::Database(sqlx::Error::PoolTimedOut), "DATABASE_ERROR"),
            (CouponError::BackendUnavailable("no url".into()), "STORAGE_ERROR"),
            (CouponError::RemoteService("down".into()), "INTERNAL_ERROR"),
            (CouponError::Internal("x".into()), "INTERNAL_ERROR"),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).error_code(), expected);
        }
    }

    #[tokio::test]
    async fn test_system_error_hides_details() {
        let response = ApiError::Database(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "DATABASE_ERROR");
        assert_eq!(body["message"], GENERIC_MESSAGE);
    }

    #[tokio::test]
    async fn test_business_error_keeps_message() {
        let response = ApiError::DuplicateCoupon("ABC".into()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "优惠券已存在: ABC");
    }
}
