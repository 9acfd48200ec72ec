// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含页面扫描与网站扫描用例
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含扫描任务、扫描结果模型以及结果整理和评分服务
pub mod domain;

/// 引擎模块
///
/// 定义浏览器引擎特质并提供 Chromium 实现
pub mod engines;

/// 基础设施模块
///
/// 提供指标导出等外部服务集成
pub mod infrastructure;

/// 队列模块
///
/// 实现任务消息的消费与结果消息的发布
pub mod queue;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;

/// 工作器模块
///
/// 实现扫描工作者和消息代理重连循环
pub mod workers;
