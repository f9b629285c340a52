//! 默认优惠券种子
//!
//! 幂等写入固定的默认优惠券目录：已有效的跳过，不存在的插入，已停用的重新启用。

use serde::Serialize;
use tracing::{error, info, instrument};

use coupon_shared::error::Result;
use coupon_shared::observability::metrics;

use crate::backend::{ActiveBackend, BackendSelector};
use crate::store::{BackendKind, CouponStore};

/// 默认优惠券目录
pub const DEFAULT_COUPONS: [&str; 20] = [
    "DANCINGPOOKI",
    "BRANZEBRANSEL",
    "GRACEOFCHAOS",
    "7S7E7V7E7N7",
    "SENAHAJASENA",
    "HAPPYNEWYEAR2026",
    "CHAOSESSENCE",
    "100MILLIONHEARTS",
    "77EVENT77",
    "KEYKEYKEY",
    "POOKIFIVEKINDS",
    "LETSGO7K",
    "GOLDENKINGPEPE",
    "DELLONSVSKRIS",
    "TARGETWISH",
    "HALFGOODHALFEVIL",
    "OBLIVION",
    "SENASTARCRYSTAL",
    "SENA77MEMORY",
    "SUNWUKONGNO1",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub added: Vec<String>,
    pub skipped: Vec<String>,
}

/// 一次种子写入的结果及其实际落地的后端
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedOutcome {
    pub report: SeedReport,
    pub source: BackendKind,
    /// 持久化存储中途故障后改写内存存储
    pub fallback: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SeedManager;

impl SeedManager {
    pub fn new() -> Self {
        Self
    }

    /// 在给定存储上写入默认目录
    pub async fn seed(&self, store: &dyn CouponStore) -> Result<SeedReport> {
        let mut report = SeedReport::default();
        for code in DEFAULT_COUPONS {
            if store.ensure_active(code).await? {
                report.added.push(code.to_string());
            } else {
                report.skipped.push(code.to_string());
            }
        }
        Ok(report)
    }

    /// 在选择器给出的后端上写入默认目录
    ///
    /// 持久化存储中途故障时改在内存存储上重做一遍；种子写入幂等，重做不会重复生效
    #[instrument(skip(self, selector))]
    pub async fn seed_selected(&self, selector: &BackendSelector) -> Result<SeedOutcome> {
        let backend = selector.select().await;

        let (report, source, fallback) = match &backend {
            ActiveBackend::Durable(store) => match self.seed(store.as_ref()).await {
                Ok(report) => (report, BackendKind::Durable, false),
                Err(e) => {
                    error!(error = %e, "Durable seed failed, seeding transient store");
                    metrics::record_backend_fallback("seed");
                    let report = self.seed(selector.transient().as_ref()).await?;
                    (report, BackendKind::Transient, true)
                }
            },
            ActiveBackend::Transient(store) => {
                (self.seed(store.as_ref()).await?, BackendKind::Transient, false)
            }
        };

        metrics::record_seeded(source.as_str(), report.added.len());
        info!(
            added = report.added.len(),
            skipped = report.skipped.len(),
            source = source.as_str(),
            fallback,
            "Default coupons seeded"
        );

        Ok(SeedOutcome {
            report,
            source,
            fallback,
        })
    }
}
