// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 结果格式化（result_formatter）：将引擎原始输出规范化为页面结果
/// - 评分引擎（scoring_engine）：根据违规统计计算页面与网站评分
pub mod result_formatter;
pub mod scoring_engine;
