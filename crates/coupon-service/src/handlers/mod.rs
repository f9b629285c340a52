//! HTTP 请求处理器

pub mod coupon;
pub mod health;
pub mod redeem;
