// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模块
///
/// 定义消息代理的通道与连接器特质，并提供基于 Redis 列表的实现
/// 负责任务消息的取出、确认、拒绝以及结果消息的发布
pub mod message_broker;
pub mod redis_broker;
