// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

use crate::queue::message_broker::BrokerError;

/// Worker错误类型
#[derive(Error, Debug)]
pub enum WorkerError {
    /// 消息代理错误，由重连循环处理
    #[error("消息代理错误: {0}")]
    BrokerError(#[from] BrokerError),

    /// 结果无法序列化
    #[error("序列化错误: {0}")]
    SerializationError(#[from] serde_json::Error),
}
