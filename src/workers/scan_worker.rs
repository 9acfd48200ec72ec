// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::application::usecases::scan_website::WebsiteScanner;
use crate::domain::models::scan_job::ScanJob;
use crate::domain::models::scan_result::WebsiteResult;
use crate::queue::message_broker::{Delivery, MessageChannel};
use crate::utils::errors::WorkerError;

/// 消息正文缺失或无法解析时写入失败结果的错误信息
pub const MALFORMED_MESSAGE_ERROR: &str = "Received a message without a valid scan job body.";

/// 扫描工作者
///
/// 逐条处理任务消息：解析任务、扫描网站、发布结果，发布成功后才确认消息。
pub struct ScanWorker {
    scanner: Arc<WebsiteScanner>,
    poll_interval: Duration,
    worker_id: Uuid,
}

impl ScanWorker {
    /// 创建新的扫描工作器实例
    pub fn new(scanner: Arc<WebsiteScanner>, poll_interval: Duration) -> Self {
        Self {
            scanner,
            poll_interval,
            worker_id: Uuid::new_v4(),
        }
    }

    /// 工作者标识，也用作消息代理的消费者标识
    pub fn worker_id(&self) -> Uuid {
        self.worker_id
    }

    /// 在通道上持续消费任务消息
    ///
    /// 只有消息代理出错时才返回，由重连循环决定后续处理。
    pub async fn consume(&self, channel: &dyn MessageChannel) -> Result<(), WorkerError> {
        info!("Scan worker {} started", self.worker_id);

        loop {
            match channel.next_delivery().await? {
                Some(delivery) => self.handle_delivery(channel, delivery).await?,
                None => sleep(self.poll_interval).await,
            }
        }
    }

    /// 处理一条任务消息
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 结果已发布，消息已确认或拒绝
    /// * `Err(WorkerError)` - 发布或确认失败，消息保持待处理状态
    #[instrument(skip(self, channel, delivery), fields(worker_id = %self.worker_id))]
    pub async fn handle_delivery(
        &self,
        channel: &dyn MessageChannel,
        delivery: Delivery,
    ) -> Result<(), WorkerError> {
        let job = match Self::parse_job(&delivery) {
            Some(job) => job,
            None => {
                warn!("Rejecting message with absent or unparseable body");
                counter!("scan_jobs_failed_total").increment(1);
                Self::publish(channel, &WebsiteResult::failed(MALFORMED_MESSAGE_ERROR)).await?;
                channel.reject(&delivery, false).await?;
                return Ok(());
            }
        };

        info!(job_id = job.job_id, "Processing scan job");
        let result = self.scanner.scan_website(&job).await;

        if let Err(e) = Self::publish(channel, &result).await {
            error!(job_id = job.job_id, "Failed to publish result, leaving job unacknowledged: {}", e);
            return Err(e);
        }
        channel.ack(&delivery).await?;

        info!(job_id = job.job_id, status = %result.scan_status, "Scan job completed");
        Ok(())
    }

    fn parse_job(delivery: &Delivery) -> Option<ScanJob> {
        let body = delivery.body()?;
        match serde_json::from_str::<ScanJob>(body) {
            Ok(job) => Some(job),
            Err(e) => {
                warn!("Invalid scan job payload: {}", e);
                None
            }
        }
    }

    async fn publish(channel: &dyn MessageChannel, result: &WebsiteResult) -> Result<(), WorkerError> {
        let payload = serde_json::to_string(result)?;
        channel.publish_result(&payload).await?;
        Ok(())
    }
}
