// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument};

use crate::queue::message_broker::BrokerConnector;
use crate::utils::errors::WorkerError;
use crate::workers::scan_worker::ScanWorker;
use crate::workers::worker::Worker;

/// 消息代理重连循环
///
/// 持有唯一的连接句柄：建立连接后把扫描工作者挂到通道上，
/// 连接失败或消费出错时丢弃句柄，等待固定间隔后重新开始。
pub struct BrokerSupervisor {
    connector: Arc<dyn BrokerConnector>,
    worker: ScanWorker,
    reconnect_delay: Duration,
}

impl BrokerSupervisor {
    pub fn new(connector: Arc<dyn BrokerConnector>, worker: ScanWorker, reconnect_delay: Duration) -> Self {
        Self {
            connector,
            worker,
            reconnect_delay,
        }
    }

    /// 一次完整的连接与消费过程
    ///
    /// 消费正常情况下不会结束，因此返回值总是本次连接失败的原因。
    #[instrument(skip(self), fields(target = %self.connector.target()))]
    pub async fn run_once(&self) -> Result<(), WorkerError> {
        info!("Connecting to message broker");
        let channel = self.connector.connect().await?;
        info!("Connected to message broker");
        self.worker.consume(channel.as_ref()).await
    }

    /// 永久运行重连循环，只会随进程结束
    pub async fn run_forever(&self) {
        loop {
            match self.run_once().await {
                Ok(()) => info!("Broker subscription ended"),
                Err(e) => error!("Broker connection failed: {}", e),
            }

            info!("Reconnecting in {:?}", self.reconnect_delay);
            counter!("broker_reconnects_total").increment(1);
            sleep(self.reconnect_delay).await;
        }
    }
}

#[async_trait]
impl Worker for BrokerSupervisor {
    async fn run(&self) -> Result<(), WorkerError> {
        self.run_forever().await;
        Ok(())
    }

    fn name(&self) -> &str {
        "broker-supervisor"
    }
}
