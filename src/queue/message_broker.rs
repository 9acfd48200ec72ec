// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// 消息代理错误类型
#[derive(Error, Debug)]
pub enum BrokerError {
    /// Redis 连接或命令错误
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// 消息序列化失败
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 连接已断开
    #[error("Connection closed: {0}")]
    Closed(String),
}

/// 从任务队列取出的一条消息
///
/// 在确认（ack）或拒绝（reject）之前一直处于待处理状态。
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    /// 代理中保存的原始负载，用于确认和拒绝
    pub raw: Vec<u8>,
}

impl Delivery {
    pub fn new(raw: impl Into<Vec<u8>>) -> Self {
        Self { raw: raw.into() }
    }

    /// 消息正文，空负载或非 UTF-8 负载视为缺失
    pub fn body(&self) -> Option<&str> {
        std::str::from_utf8(&self.raw)
            .ok()
            .filter(|body| !body.trim().is_empty())
    }
}

/// 已建立连接的消息通道
///
/// 预取数为 1：在上一条消息被确认或拒绝之前不应再取下一条。
#[async_trait]
pub trait MessageChannel: Send + Sync {
    /// 取出下一条任务消息，队列为空时返回 `None`
    async fn next_delivery(&self) -> Result<Option<Delivery>, BrokerError>;

    /// 发布一条结果消息
    async fn publish_result(&self, payload: &str) -> Result<(), BrokerError>;

    /// 确认消息已处理
    async fn ack(&self, delivery: &Delivery) -> Result<(), BrokerError>;

    /// 拒绝消息，`requeue` 为真时放回任务队列
    async fn reject(&self, delivery: &Delivery, requeue: bool) -> Result<(), BrokerError>;
}

/// 消息代理连接器
///
/// 每次调用建立一个全新的连接，由重连循环持有并在失败时整体丢弃。
#[async_trait]
pub trait BrokerConnector: Send + Sync {
    /// 建立连接、声明队列并恢复未确认的消息
    async fn connect(&self) -> Result<Box<dyn MessageChannel>, BrokerError>;

    /// 用于日志输出的连接目标，不包含密码
    fn target(&self) -> String;
}

#[async_trait]
impl<T: BrokerConnector + ?Sized> BrokerConnector for Arc<T> {
    async fn connect(&self) -> Result<Box<dyn MessageChannel>, BrokerError> {
        (**self).connect().await
    }

    fn target(&self) -> String {
        (**self).target()
    }
}
