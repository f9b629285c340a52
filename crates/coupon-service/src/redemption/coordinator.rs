//! 兑换流程编排

use std::sync::Arc;
use std::time::Instant;

use coupon_shared::observability::metrics;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use super::client::RewardApi;
use crate::models::{
    RedemptionEnvelope, RedemptionFailure, RedemptionResult, RedemptionStatus,
    RemoteRedeemResponse,
};

pub const PID_REQUIRED: &str = "PID is required";
pub const COUPON_CODE_REQUIRED: &str = "Coupon code is required";
pub const SUCCESS_MESSAGE: &str = "แลกคูปองสำเร็จ!";
pub const DEFAULT_ERROR_MESSAGE: &str = "เกิดข้อผิดพลาด";
pub const CONNECTION_FAILED_MESSAGE: &str = "การเชื่อมต่อล้มเหลว";
pub const REDEEM_FAILED: &str = "Failed to redeem coupon";

pub struct RedemptionCoordinator {
    api: Arc<dyn RewardApi>,
}

impl RedemptionCoordinator {
    pub fn new(api: Arc<dyn RewardApi>) -> Self {
        Self { api }
    }

    /// 兑换一张优惠券
    ///
    /// 优惠券码原样转发给远端，不做规范化。任何失败都折叠为 `Error` 状态的信封，不返回 Err。
    #[instrument(skip(self))]
    pub async fn redeem(&self, player_id: &str, coupon_code: &str) -> RedemptionEnvelope {
        if player_id.is_empty() {
            return Self::rejected(coupon_code, PID_REQUIRED);
        }
        if coupon_code.is_empty() {
            return Self::rejected(coupon_code, COUPON_CODE_REQUIRED);
        }

        let started = Instant::now();
        let envelope = match self.api.redeem(player_id, coupon_code).await {
            Ok(raw) => Self::map_reply(coupon_code, raw),
            Err(e) => {
                error!(error = %e, "Reward API call failed");
                RedemptionEnvelope::failed(
                    RedemptionFailure::RemoteService,
                    "",
                    CONNECTION_FAILED_MESSAGE,
                    REDEEM_FAILED,
                )
            }
        };

        metrics::record_redemption(
            envelope.result.status.as_str(),
            started.elapsed().as_secs_f64(),
        );
        envelope
    }

    fn rejected(coupon_code: &str, reason: &str) -> RedemptionEnvelope {
        warn!(reason, "Redemption rejected before remote call");
        RedemptionEnvelope::failed(RedemptionFailure::Validation, coupon_code, reason, reason)
    }

    fn map_reply(coupon_code: &str, raw: Value) -> RedemptionEnvelope {
        // 数组也能按位置反序列化为结构体，先限定为对象
        let parsed = if raw.is_object() {
            serde_json::from_value::<RemoteRedeemResponse>(raw.clone()).map_err(|e| e.to_string())
        } else {
            Err(format!("expected JSON object, got {raw}"))
        };

        let reply = match parsed {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "Reward API reply has unexpected shape");
                return RedemptionEnvelope::failed(
                    RedemptionFailure::RemoteService,
                    "",
                    CONNECTION_FAILED_MESSAGE,
                    REDEEM_FAILED,
                )
                .with_raw_response(raw);
            }
        };

        let status = RedemptionStatus::from_error_code(reply.error_code);
        let message = reply
            .error_message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if status.is_success() {
                    SUCCESS_MESSAGE.to_string()
                } else {
                    DEFAULT_ERROR_MESSAGE.to_string()
                }
            });

        let rewards = reply
            .result
            .and_then(|r| r.reward_items)
            .map(|items| items.len())
            .unwrap_or_default();
        info!(
            status = status.as_str(),
            status_label = status.label(),
            error_code = ?reply.error_code,
            rewards,
            "Coupon redemption completed"
        );

        RedemptionEnvelope::completed(
            RedemptionResult {
                code: coupon_code.to_string(),
                status,
                message,
                error_code: reply.error_code,
            },
            raw,
        )
    }
}
