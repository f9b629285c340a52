//! 优惠券兑换
//!
//! 校验入参，调用外部奖励服务，并把远端错误码归类为对外的兑换状态。

mod client;
mod coordinator;

pub use client::{GAME_CODE, HttpRewardClient, LANG_CODE, RewardApi};
pub use coordinator::{
    CONNECTION_FAILED_MESSAGE, COUPON_CODE_REQUIRED, DEFAULT_ERROR_MESSAGE, PID_REQUIRED,
    REDEEM_FAILED, RedemptionCoordinator, SUCCESS_MESSAGE,
};

#[cfg(test)]
pub use client::MockRewardApi;
