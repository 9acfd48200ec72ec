// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含扫描流水线的用例实现
/// 用例只依赖领域模型和引擎特质，不直接接触消息代理
pub mod usecases;
