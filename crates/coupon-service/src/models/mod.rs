//! 数据模型

mod coupon;
mod redemption;

pub use coupon::{Coupon, canonical_code, normalize_code};
pub use redemption::{
    RedemptionEnvelope, RedemptionFailure, RedemptionResult, RedemptionStatus,
    RemoteRedeemResponse, RewardResult,
};
