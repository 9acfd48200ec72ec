// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use scanrs::domain::models::engine_output::EngineOutput;
use scanrs::engines::traits::{BrowserEngine, BrowserSession, EngineError, PageContext};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 浏览器在分析期间页面跳转时给出的错误
pub const CONTEXT_DESTROYED: &str =
    "Execution context was destroyed, most likely because of a navigation.";

/// 页面在假引擎中的行为
#[derive(Debug, Clone)]
pub enum PageBehavior {
    /// 正常返回引擎输出
    Output(EngineOutput),
    /// 等待一段时间后返回，用来打乱完成顺序
    Delayed(Duration, EngineOutput),
    /// 第一次分析时上下文被销毁，第二次成功
    TransientOnce(EngineOutput),
    /// 每次分析都遇到上下文被销毁
    AlwaysTransient,
    /// 分析失败
    Fail(EngineError),
    /// 分析永不结束
    Hang,
}

/// 调用计数
#[derive(Debug, Default)]
pub struct FakeStats {
    pub launches: AtomicUsize,
    pub contexts_opened: AtomicUsize,
    pub contexts_closed: AtomicUsize,
    pub navigation_waits: AtomicUsize,
    pub shutdowns: AtomicUsize,
    analyses: Mutex<HashMap<String, usize>>,
}

impl FakeStats {
    pub fn analyses_of(&self, url: &str) -> usize {
        self.analyses.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    fn record_analysis(&self, url: &str) -> usize {
        let mut analyses = self.analyses.lock().unwrap();
        let count = analyses.entry(url.to_string()).or_insert(0);
        *count += 1;
        *count
    }
}

/// 按页面地址返回预设行为的引擎，未登记的地址导航失败
#[derive(Clone, Default)]
pub struct FakeEngine {
    pages: Arc<HashMap<String, PageBehavior>>,
    launch_error: Option<EngineError>,
    pub stats: Arc<FakeStats>,
}

impl FakeEngine {
    pub fn new<I>(pages: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, PageBehavior)>,
    {
        Self {
            pages: Arc::new(
                pages
                    .into_iter()
                    .map(|(url, behavior)| (url.to_string(), behavior))
                    .collect(),
            ),
            launch_error: None,
            stats: Arc::new(FakeStats::default()),
        }
    }

    pub fn failing_launch(error: EngineError) -> Self {
        Self {
            launch_error: Some(error),
            ..Self::default()
        }
    }
}

#[async_trait]
impl BrowserEngine for FakeEngine {
    async fn launch(&self) -> Result<Arc<dyn BrowserSession>, EngineError> {
        self.stats.launches.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.launch_error {
            return Err(error.clone());
        }
        Ok(Arc::new(FakeSession {
            pages: self.pages.clone(),
            stats: self.stats.clone(),
        }))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

struct FakeSession {
    pages: Arc<HashMap<String, PageBehavior>>,
    stats: Arc<FakeStats>,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn open_context(&self) -> Result<Box<dyn PageContext>, EngineError> {
        self.stats.contexts_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakePage {
            pages: self.pages.clone(),
            stats: self.stats.clone(),
            url: None,
        }))
    }

    async fn shutdown(&self) -> Result<(), EngineError> {
        self.stats.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FakePage {
    pages: Arc<HashMap<String, PageBehavior>>,
    stats: Arc<FakeStats>,
    url: Option<String>,
}

#[async_trait]
impl PageContext for FakePage {
    async fn navigate(&mut self, url: &str) -> Result<(), EngineError> {
        if !self.pages.contains_key(url) {
            return Err(EngineError::Navigation(format!(
                "net::ERR_NAME_NOT_RESOLVED at {}",
                url
            )));
        }
        self.url = Some(url.to_string());
        Ok(())
    }

    async fn analyze(&mut self) -> Result<EngineOutput, EngineError> {
        let url = self.url.clone().unwrap_or_default();
        let attempt = self.stats.record_analysis(&url);
        let behavior = self.pages.get(&url).cloned();

        match behavior {
            Some(PageBehavior::Output(output)) => Ok(output),
            Some(PageBehavior::Delayed(delay, output)) => {
                tokio::time::sleep(delay).await;
                Ok(output)
            }
            Some(PageBehavior::TransientOnce(output)) if attempt > 1 => Ok(output),
            Some(PageBehavior::TransientOnce(_)) | Some(PageBehavior::AlwaysTransient) => {
                Err(EngineError::Analysis(CONTEXT_DESTROYED.to_string()))
            }
            Some(PageBehavior::Fail(error)) => Err(error),
            Some(PageBehavior::Hang) => std::future::pending().await,
            None => Err(EngineError::Analysis("page was never navigated".to_string())),
        }
    }

    async fn wait_for_navigation(&mut self) -> Result<(), EngineError> {
        self.stats.navigation_waits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), EngineError> {
        self.stats.contexts_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
