//! 优惠券中继服务
//!
//! 管理可兑换的优惠券目录，并把玩家的兑换请求转发给外部奖励服务。
//!
//! ## 核心功能
//!
//! - **优惠券目录**：添加、软删除、批量添加与默认目录种子写入
//! - **双后端存储**：优先使用 PostgreSQL，不可用时退回进程内存储
//! - **兑换**：校验入参后调用奖励服务，并把远端错误码归类为兑换状态
//!
//! ## 模块结构
//!
//! - `store`: 存储接口及 PostgreSQL / 内存实现
//! - `backend`: 持久化存储连接与后端选择
//! - `repository`: 优惠券仓储（规范化与故障策略）
//! - `seed`: 默认优惠券种子
//! - `redemption`: 奖励服务客户端与兑换流程
//! - `dto` / `error` / `handlers` / `routes` / `state`: HTTP 边界

pub mod backend;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod redemption;
pub mod repository;
pub mod routes;
pub mod seed;
pub mod state;
pub mod store;

pub use backend::{ActiveBackend, BackendSelector, DurableConnector, PgConnector};
pub use error::{ApiError, Result};
pub use models::{Coupon, RedemptionEnvelope, RedemptionResult, RedemptionStatus};
pub use redemption::{HttpRewardClient, RedemptionCoordinator, RewardApi};
pub use repository::{BulkAddReport, CouponRepository};
pub use seed::{DEFAULT_COUPONS, SeedManager, SeedOutcome, SeedReport};
pub use state::AppState;
pub use store::{BackendKind, CouponStore, PgCouponStore, TransientCouponStore};
