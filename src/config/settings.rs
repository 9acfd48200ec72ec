// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// 环境变量前缀，例如 `SCANRS__BROKER__HOSTNAME`
pub const ENV_PREFIX: &str = "SCANRS";

/// 配置错误类型
#[derive(Error, Debug)]
pub enum SettingsError {
    /// 配置源解析失败，包括必填项缺失
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// 必填项为空
    #[error("Missing required configuration value: {0}")]
    Missing(&'static str),
}

/// 应用程序配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 消息代理配置
    pub broker: BrokerSettings,
    /// 浏览器配置
    pub browser: BrowserSettings,
    /// 扫描配置
    pub scan: ScanSettings,
    /// 指标配置
    #[serde(default)]
    pub metrics: MetricsSettings,
}

/// 消息代理配置设置
///
/// 用户名、密码、主机和端口没有默认值，必须由环境提供。
#[derive(Clone, Deserialize)]
pub struct BrokerSettings {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
    /// 任务队列名称
    pub job_queue: String,
    /// 结果队列名称
    pub result_queue: String,
    /// 重连间隔（秒）
    pub reconnect_delay_secs: u64,
    /// 任务队列为空时的轮询间隔（毫秒）
    pub poll_interval_ms: u64,
}

impl BrokerSettings {
    /// 连接地址，用户名和密码经过 URL 编码
    pub fn connection_url(&self) -> String {
        format!(
            "redis://{}:{}@{}:{}",
            urlencoding::encode(&self.username),
            urlencoding::encode(&self.password),
            self.hostname,
            self.port
        )
    }

    /// 用于日志输出的连接地址，密码被隐藏
    pub fn redacted_url(&self) -> String {
        format!(
            "redis://{}:***@{}:{}",
            urlencoding::encode(&self.username),
            self.hostname,
            self.port
        )
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// Hand-written so the password never reaches the logs
impl std::fmt::Debug for BrokerSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerSettings")
            .field("username", &self.username)
            .field("password", &"***")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("job_queue", &self.job_queue)
            .field("result_queue", &self.result_queue)
            .field("reconnect_delay_secs", &self.reconnect_delay_secs)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .finish()
    }
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 远程 Chrome 调试地址，设置后不再本地启动浏览器
    pub remote_url: Option<String>,
    /// 是否关闭沙箱（容器内运行时需要）
    pub no_sandbox: bool,
    /// CDP 请求超时时间（秒）
    pub request_timeout_secs: u64,
}

/// 扫描配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ScanSettings {
    /// 注入页面的无障碍引擎脚本路径
    pub engine_script_path: String,
    /// 单个页面扫描（含重试）的超时时间（秒）
    pub page_timeout_secs: u64,
}

impl ScanSettings {
    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }
}

/// 指标配置设置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsSettings {
    /// Prometheus 导出地址，未设置时不启动导出器
    pub listen_addr: Option<String>,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从配置文件和环境变量加载配置，并立即校验必填项。
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(SettingsError)` - 配置加载失败或缺少必填项
    pub fn new() -> Result<Self, SettingsError> {
        Self::load(None)
    }

    /// 使用给定的环境变量集合加载配置，不读取进程环境
    pub fn from_env_map(vars: HashMap<String, String>) -> Result<Self, SettingsError> {
        Self::load(Some(vars))
    }

    fn load(vars: Option<HashMap<String, String>>) -> Result<Self, SettingsError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let environment = Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .source(vars.map(|vars| vars.into_iter().collect()));

        let builder = Config::builder()
            // Broker defaults; credentials and address have none
            .set_default("broker.job_queue", "scan_jobs")?
            .set_default("broker.result_queue", "scan_results")?
            .set_default("broker.reconnect_delay_secs", 3)?
            .set_default("broker.poll_interval_ms", 1000)?
            // Browser defaults
            .set_default("browser.no_sandbox", true)?
            .set_default("browser.request_timeout_secs", 30)?
            // Scan defaults
            .set_default("scan.engine_script_path", "assets/axe.min.js")?
            .set_default("scan.page_timeout_secs", 60)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(environment);

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// 校验必填项不为空
    pub fn validate(&self) -> Result<(), SettingsError> {
        let broker = &self.broker;
        if broker.username.trim().is_empty() {
            return Err(SettingsError::Missing("broker.username"));
        }
        if broker.password.is_empty() {
            return Err(SettingsError::Missing("broker.password"));
        }
        if broker.hostname.trim().is_empty() {
            return Err(SettingsError::Missing("broker.hostname"));
        }
        if broker.port == 0 {
            return Err(SettingsError::Missing("broker.port"));
        }
        Ok(())
    }
}
