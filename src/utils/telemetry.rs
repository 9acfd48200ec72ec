// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 未设置 `RUST_LOG` 时使用的日志过滤规则
pub const DEFAULT_FILTER: &str = "info,scanrs=debug";

/// 选择日志输出格式的环境变量
pub const LOG_FORMAT_ENV: &str = "SCANRS_LOG_FORMAT";

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 人类可读的文本
    #[default]
    Text,
    /// 每行一个 JSON 对象，便于日志采集
    Json,
}

impl LogFormat {
    /// 解析格式名称，未知名称回退为文本格式
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }

    /// 从 `SCANRS_LOG_FORMAT` 读取
    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }
}

/// 构建日志过滤器，优先读取 `RUST_LOG`
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())
}

/// 安装全局日志订阅器，只在进程入口调用一次
pub fn init_telemetry() {
    let format = LogFormat::from_env();

    tracing_subscriber::registry()
        .with(env_filter())
        .with((format == LogFormat::Json).then(|| tracing_subscriber::fmt::layer().json()))
        .with((format == LogFormat::Text).then(|| tracing_subscriber::fmt::layer()))
        .init();
}
