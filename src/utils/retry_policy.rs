// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::EngineError;

/// 页面分析期间导航上下文被销毁时浏览器给出的错误片段
///
/// 重定向或客户端路由与分析并发时出现，属于瞬时错误。
const TRANSIENT_NAVIGATION_PATTERNS: [&str; 1] = ["execution context was destroyed"];

/// 判断错误信息是否表示瞬时的导航上下文销毁
pub fn is_transient_navigation_message(message: &str) -> bool {
    let message = message.to_lowercase();
    TRANSIENT_NAVIGATION_PATTERNS
        .iter()
        .any(|pattern| message.contains(pattern))
}

/// 判断引擎错误是否可以通过一次恢复重试解决
///
/// 只有导航上下文被销毁这一类错误可以重试，其余错误直接进入失败路径。
pub fn is_transient_navigation_error(error: &EngineError) -> bool {
    match error {
        EngineError::Navigation(message) | EngineError::Analysis(message) => {
            is_transient_navigation_message(message)
        }
        EngineError::Thrown(value) => value
            .get("message")
            .and_then(|m| m.as_str())
            .or_else(|| value.as_str())
            .is_some_and(is_transient_navigation_message),
        _ => false,
    }
}
