//! PostgreSQL 优惠券存储
//!
//! 持久化后端。唯一性由 `coupons.code` 主键保证，插入使用
//! `ON CONFLICT DO NOTHING`，检查与写入在一条语句内完成。

use async_trait::async_trait;
use coupon_shared::database::Database;
use coupon_shared::error::Result;
use tracing::instrument;

use super::CouponStore;
use crate::models::Coupon;

/// PostgreSQL 优惠券存储
#[derive(Clone)]
pub struct PgCouponStore {
    db: Database,
}

impl PgCouponStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CouponStore for PgCouponStore {
    /// 按创建时间倒序返回
    #[instrument(skip(self))]
    async fn list_active(&self) -> Result<Vec<Coupon>> {
        let coupons = sqlx::query_as::<_, Coupon>(
            r#"
            SELECT code, description, created_at, is_active
            FROM coupons
            WHERE is_active = TRUE
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(coupons)
    }

    #[instrument(skip(self, coupon), fields(code = %coupon.code))]
    async fn insert_if_absent(&self, coupon: Coupon) -> Result<Option<Coupon>> {
        let inserted = sqlx::query_as::<_, Coupon>(
            r#"
            INSERT INTO coupons (code, description, created_at, is_active)
            VALUES ($1, $2, $3, TRUE)
            ON CONFLICT (code) DO NOTHING
            RETURNING code, description, created_at, is_active
            "#,
        )
        .bind(&coupon.code)
        .bind(&coupon.description)
        .bind(coupon.created_at)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(inserted)
    }

    #[instrument(skip(self))]
    async fn deactivate(&self, code: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE coupons
            SET is_active = FALSE
            WHERE code = $1
            "#,
        )
        .bind(code)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn ensure_active(&self, code: &str) -> Result<bool> {
        // 已有效的记录不满足 DO UPDATE 的 WHERE 条件，不会返回行
        let touched: Option<String> = sqlx::query_scalar(
            r#"
            INSERT INTO coupons (code, description, created_at, is_active)
            VALUES ($1, '', NOW(), TRUE)
            ON CONFLICT (code) DO UPDATE SET is_active = TRUE
            WHERE coupons.is_active = FALSE
            RETURNING code
            "#,
        )
        .bind(code)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(touched.is_some())
    }
}
