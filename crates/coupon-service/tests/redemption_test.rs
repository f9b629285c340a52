//! 兑换 API 与奖励服务客户端集成测试

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode, header},
    routing::get,
};
use common::{StubRewardApi, TestApp};
use coupon_service::{HttpRewardClient, RewardApi};
use coupon_shared::config::RewardApiConfig;
use coupon_shared::error::CouponError;
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[tokio::test]
async fn test_redeem_success() {
    let api = Arc::new(StubRewardApi::replying(json!({
        "result": { "rewardItems": [{ "itemName": "Gem", "itemCount": 30 }] }
    })));
    let app = TestApp::transient_only(api.clone());

    let (status, body) = app
        .send("POST", "/api/redeem", Some(json!({ "pid": "P1", "couponCode": "LETSGO7K" })))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["result"]["status"], "success");
    assert_eq!(body["result"]["code"], "LETSGO7K");
    assert_eq!(body["result"]["message"], "แลกคูปองสำเร็จ!");
    assert!(body["result"].get("errorCode").is_none());
    assert_eq!(body["rawResponse"]["result"]["rewardItems"][0]["itemCount"], 30);
    assert_eq!(api.calls(), 1);
}

#[tokio::test]
async fn test_redeem_business_rejection_is_ok_status() {
    let api = Arc::new(StubRewardApi::replying(json!({
        "errorCode": 24004,
        "errorMessage": "이미 사용된 쿠폰입니다"
    })));
    let app = TestApp::transient_only(api);

    let (status, body) = app
        .send("POST", "/api/redeem", Some(json!({ "pid": "P1", "couponCode": "USED" })))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["result"]["status"], "already_used");
    assert_eq!(body["result"]["errorCode"], 24004);
    assert_eq!(body["result"]["message"], "이미 사용된 쿠폰입니다");
}

#[tokio::test]
async fn test_redeem_validation_makes_no_call() {
    let api = Arc::new(StubRewardApi::replying(json!({})));
    let app = TestApp::transient_only(api.clone());

    let (status, body) = app
        .send("POST", "/api/redeem", Some(json!({ "pid": "", "couponCode": "X" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["result"]["status"], "error");
    assert_eq!(body["result"]["code"], "X");
    assert_eq!(body["error"], "PID is required");

    let (status, body) = app
        .send("POST", "/api/redeem", Some(json!({ "pid": "P1" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Coupon code is required");

    let (status, body) = app
        .send("POST", "/api/redeem", Some(json!({ "pid": 12345, "couponCode": "X" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "PID is required");

    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn test_redeem_remote_failure() {
    let api = Arc::new(StubRewardApi::failing("connection refused"));
    let app = TestApp::transient_only(api);

    let (status, body) = app
        .send("POST", "/api/redeem", Some(json!({ "pid": "P1", "couponCode": "X" })))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["result"]["status"], "error");
    assert_eq!(body["result"]["code"], "");
    assert_eq!(body["result"]["message"], "การเชื่อมต่อล้มเหลว");
    assert_eq!(body["error"], "Failed to redeem coupon");
}

// ==================== 奖励服务客户端 ====================

/// 在本地端口启动一个奖励服务桩，返回其地址
async fn spawn_reward_stub(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api/coupon/reward")
}

fn client_for(base_url: String) -> HttpRewardClient {
    HttpRewardClient::new(&RewardApiConfig {
        base_url,
        user_agent: "coupon-test-agent".to_string(),
    })
    .unwrap()
}

#[tokio::test]
async fn test_client_sends_expected_query_and_headers() {
    let router = Router::new().route(
        "/api/coupon/reward",
        get(|Query(params): Query<HashMap<String, String>>, headers: HeaderMap| async move {
            Json(json!({
                "params": params,
                "accept": headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()),
                "userAgent": headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok()),
            }))
        }),
    );
    let client = client_for(spawn_reward_stub(router).await);

    let echo = client.redeem("player 1&x", "LETS GO/7K").await.unwrap();

    assert_eq!(echo["params"]["gameCode"], "tskgb");
    assert_eq!(echo["params"]["langCd"], "TH_TH");
    assert_eq!(echo["params"]["pid"], "player 1&x");
    assert_eq!(echo["params"]["couponCode"], "LETS GO/7K");
    assert_eq!(echo["accept"], "application/json");
    assert_eq!(echo["userAgent"], "coupon-test-agent");
}

#[tokio::test]
async fn test_client_maps_non_success_status_by_body() {
    let router = Router::new().route(
        "/api/coupon/reward",
        get(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errorCode": 24003, "errorMessage": "expired" })),
            )
        }),
    );
    let client = client_for(spawn_reward_stub(router).await);

    let reply: Value = client.redeem("P1", "OLD").await.unwrap();
    assert_eq!(reply["errorCode"], 24003);
}

#[tokio::test]
async fn test_client_rejects_non_json_body() {
    let router = Router::new().route("/api/coupon/reward", get(|| async { "<html>busy</html>" }));
    let client = client_for(spawn_reward_stub(router).await);

    let err = client.redeem("P1", "X").await.unwrap_err();
    assert!(matches!(err, CouponError::RemoteService(_)));
}
