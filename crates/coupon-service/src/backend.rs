//! 存储后端选择
//!
//! `BackendSelector` 持有持久化存储的连接生命周期：
//! 未初始化 → 连接中 → 已连接（缓存）| 不可用。
//! 连接成功后句柄在进程生命周期内复用；连接失败不会被缓存，
//! 之后到达的调用会重新尝试。同一时刻只有一个连接尝试在进行，
//! 等待该尝试的调用共享其结果：成功则复用句柄，失败则直接回退到内存存储。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use coupon_shared::config::DatabaseConfig;
use coupon_shared::database::Database;
use coupon_shared::error::{CouponError, Result};
use sqlx::migrate::Migrator;
use tokio::sync::{Mutex, OnceCell};
use tracing::{info, instrument, warn};

use crate::store::{BackendKind, CouponStore, PgCouponStore};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// 持久化存储连接器
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DurableConnector: Send + Sync {
    /// 建立持久化存储连接，返回可用的存储句柄
    async fn connect(&self) -> Result<Arc<dyn CouponStore>>;
}

/// PostgreSQL 连接器
///
/// 连接成功后立即执行内嵌迁移，迁移失败视为连接失败
pub struct PgConnector {
    config: DatabaseConfig,
}

impl PgConnector {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DurableConnector for PgConnector {
    #[instrument(skip(self))]
    async fn connect(&self) -> Result<Arc<dyn CouponStore>> {
        let db = Database::connect(&self.config).await?;
        MIGRATOR.run(db.pool()).await?;
        info!("Durable coupon store ready");
        Ok(Arc::new(PgCouponStore::new(db)))
    }
}

/// 本次调用选中的存储后端
#[derive(Clone)]
pub enum ActiveBackend {
    Durable(Arc<dyn CouponStore>),
    Transient(Arc<dyn CouponStore>),
}

impl ActiveBackend {
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Durable(_) => BackendKind::Durable,
            Self::Transient(_) => BackendKind::Transient,
        }
    }

    pub fn store(&self) -> &Arc<dyn CouponStore> {
        match self {
            Self::Durable(store) | Self::Transient(store) => store,
        }
    }
}

impl std::fmt::Debug for ActiveBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ActiveBackend").field(&self.kind()).finish()
    }
}

/// 存储后端选择器
pub struct BackendSelector {
    connector: Arc<dyn DurableConnector>,
    durable: OnceCell<Arc<dyn CouponStore>>,
    /// 连接尝试互斥锁，只保护状态切换
    connecting: Mutex<()>,
    /// 已失败的连接尝试次数
    failed_attempts: AtomicU64,
    transient: Arc<dyn CouponStore>,
}

impl BackendSelector {
    pub fn new(connector: Arc<dyn DurableConnector>, transient: Arc<dyn CouponStore>) -> Self {
        Self {
            connector,
            durable: OnceCell::new(),
            connecting: Mutex::new(()),
            failed_attempts: AtomicU64::new(0),
            transient,
        }
    }

    /// 选择本次调用使用的后端
    ///
    /// 已缓存持久化句柄时直接返回；否则尝试连接一次，失败则返回内存存储
    pub async fn select(&self) -> ActiveBackend {
        match self.durable().await {
            Ok(store) => ActiveBackend::Durable(store),
            Err(e) => {
                warn!(
                    error = %e,
                    error_code = e.code(),
                    retryable = e.is_retryable(),
                    "Durable store unavailable, using transient store"
                );
                ActiveBackend::Transient(self.transient())
            }
        }
    }

    /// 获取持久化存储句柄，必要时发起连接
    ///
    /// 排队期间已有连接尝试失败时直接返回 `BackendUnavailable`，不再发起新的尝试
    pub async fn durable(&self) -> Result<Arc<dyn CouponStore>> {
        if let Some(store) = self.durable.get() {
            return Ok(Arc::clone(store));
        }

        let observed = self.failed_attempts.load(Ordering::Acquire);
        let _attempt = self.connecting.lock().await;

        if let Some(store) = self.durable.get() {
            return Ok(Arc::clone(store));
        }
        if self.failed_attempts.load(Ordering::Acquire) != observed {
            return Err(CouponError::BackendUnavailable(
                "并发的连接尝试已失败".to_string(),
            ));
        }

        match self.connector.connect().await {
            Ok(store) => {
                // 持有互斥锁时单元必然为空
                let _ = self.durable.set(Arc::clone(&store));
                Ok(store)
            }
            Err(e) => {
                self.failed_attempts.fetch_add(1, Ordering::AcqRel);
                Err(e)
            }
        }
    }

    /// 内存存储句柄
    pub fn transient(&self) -> Arc<dyn CouponStore> {
        Arc::clone(&self.transient)
    }

    /// 是否已缓存持久化存储句柄
    pub fn is_connected(&self) -> bool {
        self.durable.initialized()
    }
}
