//! 优惠券管理 API 处理器

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use coupon_shared::error::CouponError;
use tracing::instrument;
use validator::Validate;

use crate::{
    dto::{
        AddCouponRequest, ApiResponse, BulkAddRequest, CouponListData, RemoveCouponRequest,
        RemovedData, SeedData,
    },
    error::Result,
    models::{Coupon, normalize_code},
    repository::BulkAddReport,
    state::AppState,
};

/// 列出有效优惠券
///
/// GET /api/coupons
#[instrument(skip(state))]
pub async fn list_coupons(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CouponListData>>> {
    let (coupons, source) = state.repository.list_active().await?;
    Ok(Json(ApiResponse::success(CouponListData { coupons, source })))
}

/// 添加优惠券
///
/// POST /api/coupons
#[instrument(skip(state, body))]
pub async fn add_coupon(
    State(state): State<AppState>,
    body: std::result::Result<Json<AddCouponRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Coupon>>> {
    let Json(req) = body?;
    req.validate()?;

    let coupon = state
        .repository
        .add(&req.code, req.description.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(coupon)))
}

/// 停用优惠券
///
/// DELETE /api/coupons
#[instrument(skip(state, body))]
pub async fn remove_coupon(
    State(state): State<AppState>,
    body: std::result::Result<Json<RemoveCouponRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<RemovedData>>> {
    let Json(req) = body?;
    req.validate()?;

    if !state.repository.remove(&req.code).await? {
        return Err(CouponError::NotFound {
            code: normalize_code(&req.code),
        }
        .into());
    }
    Ok(Json(ApiResponse::success_with_message(
        RemovedData { removed: true },
        "Coupon removed",
    )))
}

/// 批量添加优惠券
///
/// POST /api/coupons/bulk
#[instrument(skip(state, body))]
pub async fn bulk_add_coupons(
    State(state): State<AppState>,
    body: std::result::Result<Json<BulkAddRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<BulkAddReport>>> {
    let Json(req) = body?;
    req.validate()?;

    let report = state.repository.bulk_add(&req.codes).await?;
    let message = format!(
        "Added: {}, Skipped: {}, Errors: {}",
        report.added.len(),
        report.skipped.len(),
        report.errors.len()
    );
    Ok(Json(ApiResponse::success_with_message(report, message)))
}

/// 写入默认优惠券
///
/// POST /api/coupons/seed
#[instrument(skip(state))]
pub async fn seed_coupons(State(state): State<AppState>) -> Result<Json<ApiResponse<SeedData>>> {
    let outcome = state.seeder.seed_selected(&state.selector).await?;

    let message = if outcome.fallback {
        format!("Seeded {} coupons (fallback)", outcome.report.added.len())
    } else {
        format!(
            "Seeded {} coupons, {} already existed",
            outcome.report.added.len(),
            outcome.report.skipped.len()
        )
    };

    let data = SeedData {
        added: outcome.report.added,
        skipped: outcome.report.skipped,
        source: outcome.source,
        fallback: outcome.fallback,
    };
    Ok(Json(ApiResponse::success_with_message(data, message)))
}
