//! 请求与响应 DTO

pub mod request;
pub mod response;

pub use request::{AddCouponRequest, BulkAddRequest, RedeemRequest, RemoveCouponRequest};
pub use response::{ApiResponse, CouponListData, RemovedData, SeedData};
