// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含扫描流水线中不依赖外部系统的部分：
/// - 领域模型（models）：任务、结果、原始引擎输出与评分
/// - 服务（services）：结果格式化与评分计算
///
/// 领域层不依赖浏览器或消息代理，全部逻辑都是纯函数。
pub mod models;
pub mod services;
