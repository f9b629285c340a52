//! 奖励服务客户端

use async_trait::async_trait;
use coupon_shared::config::RewardApiConfig;
use coupon_shared::error::{CouponError, Result};
use reqwest::{Client, Url, header};
use serde_json::Value;
use tracing::{debug, instrument};

/// 固定游戏标识
pub const GAME_CODE: &str = "tskgb";
/// 固定语言标识
pub const LANG_CODE: &str = "TH_TH";

/// 外部奖励服务
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RewardApi: Send + Sync {
    /// 发起一次兑换请求，返回远端响应体的 JSON
    ///
    /// 连接失败、传输失败或响应体不是 JSON 时返回 `RemoteService`；
    /// 非 2xx 状态码只要响应体是 JSON 仍然返回 Ok
    async fn redeem(&self, player_id: &str, coupon_code: &str) -> Result<Value>;
}

/// 基于 reqwest 的奖励服务客户端
///
/// 不重试，超时沿用 reqwest 默认值
#[derive(Clone)]
pub struct HttpRewardClient {
    client: Client,
    base_url: Url,
}

impl HttpRewardClient {
    pub fn new(config: &RewardApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            CouponError::Internal(format!("奖励服务地址无效 {}: {e}", config.base_url))
        })?;

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| CouponError::Internal(format!("创建 HTTP 客户端失败: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl RewardApi for HttpRewardClient {
    #[instrument(skip(self), fields(url = %self.base_url))]
    async fn redeem(&self, player_id: &str, coupon_code: &str) -> Result<Value> {
        let response = self
            .client
            .get(self.base_url.clone())
            .query(&[
                ("gameCode", GAME_CODE),
                ("couponCode", coupon_code),
                ("langCd", LANG_CODE),
                ("pid", player_id),
            ])
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| CouponError::RemoteService(format!("请求奖励服务失败: {e}")))?;

        let status = response.status();
        debug!(%status, "Reward API replied");

        response.json::<Value>().await.map_err(|e| {
            CouponError::RemoteService(format!("奖励服务响应无法解析 (HTTP {status}): {e}"))
        })
    }
}
