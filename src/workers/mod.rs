// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供任务消息的消费与消息代理的重连管理
/// 每个工作器同一时间只处理一个任务
pub mod scan_worker;
pub mod supervisor;
pub mod worker;

pub use worker::Worker;
