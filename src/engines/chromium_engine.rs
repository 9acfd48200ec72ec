// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use chromiumoxide::cdp::js_protocol::runtime::{EvaluateParams, ExceptionDetails, RemoteObjectSubtype};
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::settings::BrowserSettings;
use crate::domain::models::engine_output::EngineOutput;
use crate::engines::engine_script::{EngineScript, RUN_EXPRESSION};
use crate::engines::traits::{BrowserEngine, BrowserSession, EngineError, PageContext};

/// Chromium 引擎
///
/// 基于 chromiumoxide 驱动 Chrome，每个任务启动一个浏览器，
/// 每个页面使用独立的浏览器上下文（BrowserContext）。
pub struct ChromiumEngine {
    settings: BrowserSettings,
    script: Arc<EngineScript>,
}

impl ChromiumEngine {
    pub fn new(settings: BrowserSettings, script: EngineScript) -> Self {
        Self {
            settings,
            script: Arc::new(script),
        }
    }

    fn browser_config(&self) -> Result<BrowserConfig, EngineError> {
        let mut builder = BrowserConfig::builder()
            .request_timeout(Duration::from_secs(self.settings.request_timeout_secs));

        if self.settings.no_sandbox {
            builder = builder.no_sandbox();
        }

        // Production environment setup
        builder = builder.arg("--disable-gpu").arg("--disable-dev-shm-usage");

        builder.build().map_err(EngineError::Launch)
    }
}

#[async_trait]
impl BrowserEngine for ChromiumEngine {
    async fn launch(&self) -> Result<Arc<dyn BrowserSession>, EngineError> {
        // Fail the job early if the engine cannot be injected anyway
        self.script.source().await?;

        let (browser, mut handler, owned) = if let Some(ref url) = self.settings.remote_url {
            info!("Connecting to remote Chrome instance at: {}", url);
            let (browser, handler) = Browser::connect(url)
                .await
                .map_err(|e| EngineError::Launch(format!("Failed to connect to remote Chrome: {}", e)))?;
            (browser, handler, false)
        } else {
            let (browser, handler) = Browser::launch(self.browser_config()?)
                .await
                .map_err(|e| EngineError::Launch(e.to_string()))?;
            (browser, handler, true)
        };

        // Spawn a handler to process browser events
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {}", e);
                }
            }
        });

        Ok(Arc::new(ChromiumSession {
            browser: Arc::new(RwLock::new(browser)),
            handler_task,
            owned,
            script: self.script.clone(),
        }))
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

/// 一个任务使用的浏览器会话
pub struct ChromiumSession {
    browser: Arc<RwLock<Browser>>,
    handler_task: JoinHandle<()>,
    /// 本地启动的浏览器在会话结束时关闭，远程浏览器保持运行
    owned: bool,
    script: Arc<EngineScript>,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn open_context(&self) -> Result<Box<dyn PageContext>, EngineError> {
        let browser = self.browser.read().await;

        let context_id = browser
            .execute(CreateBrowserContextParams::default())
            .await
            .map_err(|e| EngineError::Context(e.to_string()))?
            .result
            .browser_context_id;

        let params = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(context_id.clone())
            .build()
            .map_err(EngineError::Context)?;

        let page = match browser.new_page(params).await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser
                    .execute(DisposeBrowserContextParams::new(context_id))
                    .await;
                return Err(EngineError::Context(e.to_string()));
            }
        };

        Ok(Box::new(ChromiumPage {
            page: Some(page),
            context_id,
            browser: self.browser.clone(),
            script: self.script.clone(),
        }))
    }

    async fn shutdown(&self) -> Result<(), EngineError> {
        if self.owned {
            let mut browser = self.browser.write().await;
            browser
                .close()
                .await
                .map_err(|e| EngineError::Launch(format!("Failed to close browser: {}", e)))?;
            if let Err(e) = browser.wait().await {
                warn!("Browser process did not exit cleanly: {}", e);
            }
        }
        self.handler_task.abort();
        Ok(())
    }
}

/// 单个页面独占的浏览器上下文
struct ChromiumPage {
    page: Option<Page>,
    context_id: BrowserContextId,
    browser: Arc<RwLock<Browser>>,
    script: Arc<EngineScript>,
}

impl ChromiumPage {
    fn page(&self) -> Result<&Page, EngineError> {
        self.page
            .as_ref()
            .ok_or_else(|| EngineError::Context("Page already closed".to_string()))
    }

    async fn evaluate(&self, expression: &str, await_promise: bool) -> Result<chromiumoxide::js::EvaluationResult, EngineError> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .await_promise(await_promise)
            .return_by_value(true)
            .build()
            .map_err(EngineError::Analysis)?;

        self.page()?
            .evaluate_expression(params)
            .await
            .map_err(analysis_error)
    }
}

/// 将 CDP 错误映射为引擎错误
fn analysis_error(error: CdpError) -> EngineError {
    match error {
        CdpError::JavascriptException(details) => exception_error(&details),
        other => EngineError::Analysis(other.to_string()),
    }
}

/// 将页面内抛出的异常映射为引擎错误
///
/// 非 Error 的值在页面内已被 `JSON.stringify` 编码为字符串，这里解码后保留为 JSON；
/// Error 实例使用其描述文本。
fn exception_error(details: &ExceptionDetails) -> EngineError {
    let Some(remote) = details.exception.as_ref() else {
        return EngineError::Analysis(details.text.clone());
    };
    let thrown_error = matches!(remote.subtype, Some(RemoteObjectSubtype::Error));

    match &remote.value {
        Some(Value::String(encoded)) if !thrown_error => EngineError::Thrown(
            serde_json::from_str(encoded).unwrap_or_else(|_| Value::String(encoded.clone())),
        ),
        Some(value) if !thrown_error => EngineError::Thrown(value.clone()),
        // Objects arrive by reference without a value
        _ => EngineError::Analysis(
            remote
                .description
                .clone()
                .unwrap_or_else(|| details.text.clone()),
        ),
    }
}

#[async_trait]
impl PageContext for ChromiumPage {
    async fn navigate(&mut self, url: &str) -> Result<(), EngineError> {
        url::Url::parse(url)
            .map_err(|e| EngineError::Navigation(format!("Invalid URL '{}': {}", url, e)))?;

        // goto waits for the load event
        self.page()?
            .goto(url)
            .await
            .map_err(|e| EngineError::Navigation(e.to_string()))?;
        Ok(())
    }

    async fn analyze(&mut self) -> Result<EngineOutput, EngineError> {
        // Navigations drop injected globals, so inject on every run
        let source = self.script.source().await?;
        self.evaluate(&source, false).await?;

        self.evaluate(RUN_EXPRESSION, true)
            .await?
            .into_value::<EngineOutput>()
            .map_err(|e| EngineError::Analysis(format!("Unexpected engine output: {}", e)))
    }

    async fn wait_for_navigation(&mut self) -> Result<(), EngineError> {
        self.page()?
            .wait_for_navigation()
            .await
            .map_err(|e| EngineError::Navigation(e.to_string()))?;
        Ok(())
    }

    async fn close(mut self: Box<Self>) -> Result<(), EngineError> {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                warn!("Failed to close page: {}", e);
            }
        }

        let browser = self.browser.read().await;
        browser
            .execute(DisposeBrowserContextParams::new(self.context_id.clone()))
            .await
            .map_err(|e| EngineError::Context(e.to_string()))?;
        Ok(())
    }
}
