// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节。
///
/// 包含的子模块：
/// - 指标（metrics）：注册扫描指标并按需启动 Prometheus 导出器
pub mod metrics;
