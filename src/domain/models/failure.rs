// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::Value;
use std::fmt;

/// 无法识别失败原因时使用的默认错误信息
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// 失败原因
///
/// 页面级与网站级失败都通过它转换为 `errorMessage`。
/// 浏览器侧抛出的值以 JSON 形式回传，因此除了 Rust 错误之外
/// 还需要处理任意 JSON 负载。
#[derive(Debug, Clone, PartialEq)]
pub enum FailureCause {
    /// 纯文本原因，原样输出
    Text(String),
    /// 错误对象，输出其错误信息
    Error(String),
    /// 任意 JSON 负载
    Payload(Value),
    /// 原因缺失
    Unknown,
}

impl FailureCause {
    /// 从实现了 `Error` 的值构造
    pub fn from_error<E: std::error::Error + ?Sized>(error: &E) -> Self {
        FailureCause::Error(error.to_string())
    }

    /// 转换为错误信息
    ///
    /// 这是一个全函数：任何输入都会得到一段非空文本。
    pub fn describe(&self) -> String {
        match self {
            FailureCause::Text(text) => text.clone(),
            FailureCause::Error(message) => message.clone(),
            FailureCause::Payload(value) => describe_payload(value),
            FailureCause::Unknown => UNKNOWN_ERROR_MESSAGE.to_string(),
        }
    }
}

fn describe_payload(value: &Value) -> String {
    match value {
        Value::Null => UNKNOWN_ERROR_MESSAGE.to_string(),
        Value::String(text) => text.clone(),
        Value::Object(map) => match map.get("message") {
            Some(Value::String(message)) => message.clone(),
            _ => value.to_string(),
        },
        other => other.to_string(),
    }
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl From<&str> for FailureCause {
    fn from(text: &str) -> Self {
        FailureCause::Text(text.to_string())
    }
}

impl From<String> for FailureCause {
    fn from(text: String) -> Self {
        FailureCause::Text(text)
    }
}

impl From<Value> for FailureCause {
    fn from(value: Value) -> Self {
        FailureCause::Payload(value)
    }
}

impl<T: Into<FailureCause>> From<Option<T>> for FailureCause {
    fn from(cause: Option<T>) -> Self {
        cause.map(Into::into).unwrap_or(FailureCause::Unknown)
    }
}
