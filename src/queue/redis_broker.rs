// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Direction};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::settings::BrokerSettings;
use crate::queue::message_broker::{BrokerConnector, BrokerError, Delivery, MessageChannel};

/// 处理中列表的名称后缀，后接消费者标识
pub const PROCESSING_SUFFIX: &str = ":processing";

/// 消费者心跳的存活时间（秒）
///
/// 心跳过期的消费者被视为已停止，其处理中列表会被其他消费者放回任务队列。
pub const CONSUMER_TTL_SECS: u64 = 30;

/// 空闲时检查已停止消费者的最小间隔
const SWEEP_INTERVAL: Duration = Duration::from_secs(CONSUMER_TTL_SECS);

/// 某个消费者使用的键名
#[derive(Debug, Clone)]
struct QueueKeys {
    job_queue: String,
    result_queue: String,
    consumer_id: String,
}

impl QueueKeys {
    fn processing_of(&self, consumer: &str) -> String {
        format!("{}{}:{}", self.job_queue, PROCESSING_SUFFIX, consumer)
    }

    fn heartbeat_of(&self, consumer: &str) -> String {
        format!("{}:consumer:{}", self.job_queue, consumer)
    }

    fn registry(&self) -> String {
        format!("{}:consumers", self.job_queue)
    }

    fn processing(&self) -> String {
        self.processing_of(&self.consumer_id)
    }

    fn heartbeat(&self) -> String {
        self.heartbeat_of(&self.consumer_id)
    }
}

/// 基于 Redis 列表的可靠队列连接器
///
/// 生产者从左侧推入任务，消费者用 `LMOVE` 从右侧原子地移入自己独占的处理中列表，
/// 确认即从该列表删除。每个消费者登记在注册集合中并维持一个带过期时间的心跳键。
///
/// 连接建立时先把本消费者遗留的消息放回任务队列，再回收心跳已过期的消费者的消息。
/// 存活消费者的处理中消息不会被触碰。
#[derive(Debug, Clone)]
pub struct RedisConnector {
    settings: BrokerSettings,
    consumer_id: Uuid,
}

impl RedisConnector {
    /// 创建连接器
    ///
    /// # 参数
    ///
    /// * `settings` - 消息代理配置
    /// * `consumer_id` - 消费者标识，同一进程的多次重连必须使用同一个值
    pub fn new(settings: BrokerSettings, consumer_id: Uuid) -> Self {
        Self {
            settings,
            consumer_id,
        }
    }

    fn keys(&self) -> QueueKeys {
        QueueKeys {
            job_queue: self.settings.job_queue.clone(),
            result_queue: self.settings.result_queue.clone(),
            consumer_id: self.consumer_id.to_string(),
        }
    }

    /// 本消费者的处理中列表
    pub fn processing_queue(&self) -> String {
        self.keys().processing()
    }
}

#[async_trait]
impl BrokerConnector for RedisConnector {
    async fn connect(&self) -> Result<Box<dyn MessageChannel>, BrokerError> {
        let client = redis::Client::open(self.settings.connection_url())?;
        let mut connection = client.get_multiplexed_async_connection().await?;

        let pong: String = redis::cmd("PING").query_async(&mut connection).await?;
        debug!("Broker answered {}", pong);

        let keys = self.keys();
        // Announce before sweeping so concurrent sweeps see this consumer alive
        refresh_heartbeat(&mut connection, &keys).await?;

        let own = move_all(&mut connection, &keys.processing(), &keys.job_queue).await?;
        if own > 0 {
            warn!("Recovered {} unacknowledged deliveries", own);
        }

        let channel = RedisChannel {
            heartbeat: spawn_heartbeat(connection.clone(), keys.clone()),
            connection,
            keys,
            last_sweep: Mutex::new(Instant::now()),
        };
        channel.recover_orphans().await?;

        info!(
            consumer = %channel.keys.consumer_id,
            "Consuming from '{}', publishing to '{}'",
            channel.keys.job_queue, channel.keys.result_queue
        );
        Ok(Box::new(channel))
    }

    fn target(&self) -> String {
        self.settings.redacted_url()
    }
}

/// Redis 消息通道
///
/// 丢弃通道即停止心跳，未确认的消息留在处理中列表等待回收。
pub struct RedisChannel {
    connection: MultiplexedConnection,
    keys: QueueKeys,
    heartbeat: JoinHandle<()>,
    last_sweep: Mutex<Instant>,
}

impl RedisChannel {
    async fn take_next(&self) -> Result<Option<Vec<u8>>, BrokerError> {
        let mut con = self.connection.clone();
        let raw: Option<Vec<u8>> = con
            .lmove(
                &self.keys.job_queue,
                &self.keys.processing(),
                Direction::Right,
                Direction::Left,
            )
            .await?;
        Ok(raw)
    }

    /// 回收心跳已过期的消费者的处理中消息
    async fn recover_orphans(&self) -> Result<usize, BrokerError> {
        let mut con = self.connection.clone();
        let registry = self.keys.registry();
        let consumers: Vec<String> = con.smembers(&registry).await?;

        let mut recovered = 0;
        for consumer in consumers.iter().filter(|c| **c != self.keys.consumer_id) {
            let alive: bool = con.exists(self.keys.heartbeat_of(consumer)).await?;
            if alive {
                continue;
            }

            let moved = move_all(&mut con, &self.keys.processing_of(consumer), &self.keys.job_queue).await?;
            con.srem::<_, _, ()>(&registry, consumer).await?;
            if moved > 0 {
                warn!(consumer = %consumer, "Recovered {} deliveries from a stopped consumer", moved);
            }
            recovered += moved;
        }

        *self.last_sweep.lock().await = Instant::now();
        Ok(recovered)
    }
}

impl Drop for RedisChannel {
    fn drop(&mut self) {
        self.heartbeat.abort();
    }
}

#[async_trait]
impl MessageChannel for RedisChannel {
    async fn next_delivery(&self) -> Result<Option<Delivery>, BrokerError> {
        if let Some(raw) = self.take_next().await? {
            return Ok(Some(Delivery::new(raw)));
        }

        // Idle: look for work stranded by stopped consumers
        if self.last_sweep.lock().await.elapsed() < SWEEP_INTERVAL {
            return Ok(None);
        }
        if self.recover_orphans().await? == 0 {
            return Ok(None);
        }
        Ok(self.take_next().await?.map(Delivery::new))
    }

    async fn publish_result(&self, payload: &str) -> Result<(), BrokerError> {
        let mut con = self.connection.clone();
        con.lpush::<_, _, ()>(&self.keys.result_queue, payload).await?;
        Ok(())
    }

    async fn ack(&self, delivery: &Delivery) -> Result<(), BrokerError> {
        let mut con = self.connection.clone();
        let removed: i64 = con.lrem(self.keys.processing(), 1, &delivery.raw).await?;
        if removed == 0 {
            warn!("Acknowledged delivery was not pending");
        }
        Ok(())
    }

    async fn reject(&self, delivery: &Delivery, requeue: bool) -> Result<(), BrokerError> {
        let mut con = self.connection.clone();
        let removed: i64 = con.lrem(self.keys.processing(), 1, &delivery.raw).await?;
        if requeue && removed > 0 {
            con.rpush::<_, _, ()>(&self.keys.job_queue, &delivery.raw).await?;
        }
        Ok(())
    }
}

/// 刷新心跳并登记消费者
async fn refresh_heartbeat(con: &mut MultiplexedConnection, keys: &QueueKeys) -> Result<(), BrokerError> {
    redis::pipe()
        .set_ex(keys.heartbeat(), 1, CONSUMER_TTL_SECS)
        .ignore()
        .sadd(keys.registry(), &keys.consumer_id)
        .ignore()
        .query_async::<()>(con)
        .await?;
    Ok(())
}

fn spawn_heartbeat(mut con: MultiplexedConnection, keys: QueueKeys) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(CONSUMER_TTL_SECS / 3));
        loop {
            ticker.tick().await;
            if let Err(e) = refresh_heartbeat(&mut con, &keys).await {
                warn!("Failed to refresh consumer heartbeat: {}", e);
            }
        }
    })
}

/// 把 `from` 中的消息逐条移回任务队列的消费端
async fn move_all(con: &mut MultiplexedConnection, from: &str, to: &str) -> Result<usize, BrokerError> {
    let mut moved = 0;
    loop {
        let item: Option<Vec<u8>> = con.lmove(from, to, Direction::Left, Direction::Right).await?;
        if item.is_none() {
            break;
        }
        moved += 1;
    }
    Ok(moved)
}
