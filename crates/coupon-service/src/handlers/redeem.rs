//! 兑换 API 处理器

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use tracing::{instrument, warn};

use crate::{
    dto::RedeemRequest,
    models::{RedemptionEnvelope, RedemptionFailure},
    state::AppState,
};

/// 兑换优惠券
///
/// POST /api/redeem
///
/// 响应体始终是兑换信封；校验失败返回 400，远端失败返回 500，
/// 远端给出业务拒绝（如已使用）时仍为 200
#[instrument(skip(state, body))]
pub async fn redeem_coupon(
    State(state): State<AppState>,
    body: Result<Json<RedeemRequest>, JsonRejection>,
) -> (StatusCode, Json<RedemptionEnvelope>) {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Malformed redeem request body");
            RedeemRequest::default()
        }
    };

    let envelope = state
        .redemption
        .redeem(req.pid(), req.coupon_code())
        .await;

    let status = match envelope.failure {
        None => StatusCode::OK,
        Some(RedemptionFailure::Validation) => StatusCode::BAD_REQUEST,
        Some(RedemptionFailure::RemoteService) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(envelope))
}
