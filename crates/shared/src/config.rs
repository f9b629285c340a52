//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// 奖励服务默认地址
pub const DEFAULT_REWARD_API_URL: &str = "https://coupon.netmarble.com/api/coupon/reward";

/// 数据库配置
///
/// `url` 为空时不尝试连接持久化存储，所有操作直接使用内存存储
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            min_connections: 1,
            connect_timeout_seconds: 5,
            idle_timeout_seconds: 600,
        }
    }
}

/// 服务配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// 奖励服务（外部兑换 API）配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RewardApiConfig {
    pub base_url: String,
    pub user_agent: String,
}

impl Default for RewardApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REWARD_API_URL.to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
        }
    }
}

/// 内存存储配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransientConfig {
    /// 启动时是否向内存存储写入默认优惠券
    pub preload_defaults: bool,
}

impl Default for TransientConfig {
    fn default() -> Self {
        Self {
            preload_defaults: true,
        }
    }
}

/// 可观测性配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// 服务名称，用于标识日志和指标的来源
    pub service_name: String,
    pub log_level: String,
    /// 是否启用 JSON 格式日志
    pub json_logs: bool,
    pub metrics_enabled: bool,
    pub metrics_port: u16,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown-service".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_port: 9090,
        }
    }
}

impl ObservabilityConfig {
    /// 注入服务名
    pub fn with_service_name(mut self, service_name: &str) -> Self {
        self.service_name = service_name.to_string();
        self
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub reward_api: RewardApiConfig,
    pub transient: TransientConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（默认配置）
    /// 2. config/{environment}.toml（环境特定配置）
    /// 3. config/{service_name}.toml（服务特定配置）
    /// 4. 环境变量（COUPON_ 前缀，层级用双下划线分隔，如 COUPON_DATABASE__URL -> database.url）
    /// 5. 兼容变量：DATABASE_URL（仅在 database.url 未配置时生效）与 {SERVICE}_PORT
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        // .env 文件不存在时忽略
        let _ = dotenvy::dotenv();

        let env = std::env::var("COUPON_ENV").unwrap_or_else(|_| "development".to_string());

        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env.clone())?
            .add_source(File::from(Path::new(&config_dir).join("default.toml")).required(false))
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", env))).required(false),
            )
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", service_name)))
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("COUPON")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        if config.database.url.is_none() {
            config.database.url = std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty());
        }

        if let Some(port) = Self::get_service_port_from_env(service_name) {
            config.server.port = port;
        }

        Ok(config)
    }

    /// 从环境变量获取服务特定端口
    ///
    /// 将 "coupon-service" 转换为 "COUPON_SERVICE_PORT"
    fn get_service_port_from_env(service_name: &str) -> Option<u16> {
        let env_var_name = Self::port_env_var_name(service_name);
        std::env::var(&env_var_name)
            .ok()
            .and_then(|v| v.parse().ok())
    }

    fn port_env_var_name(service_name: &str) -> String {
        format!("{}_PORT", service_name.to_uppercase().replace('-', "_"))
    }

    /// 获取服务地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
