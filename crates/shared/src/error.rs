//! 统一错误处理模块
//!
//! 定义优惠券存储与兑换流程共享的错误类型，使用 thiserror 提供良好的错误信息。

use thiserror::Error;

/// 系统错误类型
#[derive(Debug, Error)]
pub enum CouponError {
    // ==================== 验证错误 ====================
    #[error("参数验证失败: {0}")]
    Validation(String),

    // ==================== 存储错误 ====================
    #[error("优惠券已存在: {code}")]
    Duplicate { code: String },

    #[error("优惠券不存在: {code}")]
    NotFound { code: String },

    #[error("持久化存储不可用: {0}")]
    BackendUnavailable(String),

    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("数据库迁移失败: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    // ==================== 外部服务错误 ====================
    #[error("奖励服务调用失败: {0}")]
    RemoteService(String),

    // ==================== 通用错误 ====================
    #[error("内部错误: {0}")]
    Internal(String),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, CouponError>;

impl CouponError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Duplicate { .. } => "DUPLICATE_COUPON",
            Self::NotFound { .. } => "COUPON_NOT_FOUND",
            Self::BackendUnavailable(_) => "BACKEND_UNAVAILABLE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Migration(_) => "MIGRATION_ERROR",
            Self::RemoteService(_) => "REMOTE_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 是否为可重试错误
    ///
    /// 只有存储层故障可以在下一次调用时重试（重新建立连接或切换到内存存储）
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_) | Self::BackendUnavailable(_))
    }

    /// 是否为存储层故障（而非业务拒绝）
    pub fn is_storage_fault(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Migration(_) | Self::BackendUnavailable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        let err = CouponError::Duplicate {
            code: "ABC".to_string(),
        };
        assert_eq!(err.code(), "DUPLICATE_COUPON");
        assert_eq!(
            CouponError::NotFound { code: "X".into() }.code(),
            "COUPON_NOT_FOUND"
        );
    }

    #[test]
    fn test_is_retryable() {
        let db_err = CouponError::Database(sqlx::Error::PoolTimedOut);
        assert!(db_err.is_retryable());
        assert!(CouponError::BackendUnavailable("down".into()).is_retryable());

        let duplicate = CouponError::Duplicate {
            code: "ABC".to_string(),
        };
        assert!(!duplicate.is_retryable());
        assert!(!duplicate.is_storage_fault());
    }

    #[test]
    fn test_display_contains_code() {
        let err = CouponError::Duplicate {
            code: "SUNWUKONGNO1".to_string(),
        };
        assert!(err.to_string().contains("SUNWUKONGNO1"));
    }
}
