// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;

use metrics::counter;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::domain::models::engine_output::EngineOutput;
use crate::domain::models::failure::FailureCause;
use crate::domain::models::scan_result::WebpageResult;
use crate::domain::services::result_formatter::{format_engine_output, format_failure};
use crate::engines::traits::{BrowserSession, EngineError, PageContext};
use crate::utils::retry_policy::is_transient_navigation_error;

// === Section: Use Case Definition ===

/// 单页面扫描执行器
///
/// 为每个页面打开独立的浏览上下文，导航并运行无障碍引擎，
/// 然后把引擎输出整理为 `WebpageResult`。任何错误都会被转换为
/// 页面级失败结果，不会向调用方传播。
#[derive(Debug, Clone)]
pub struct ScanExecutor {
    page_timeout: Duration,
}

// === Section: Implementation ===

impl ScanExecutor {
    pub fn new(page_timeout: Duration) -> Self {
        Self { page_timeout }
    }

    /// 扫描单个页面
    ///
    /// # 参数
    ///
    /// * `session` - 当前任务共享的浏览器会话
    /// * `url` - 页面完整地址
    /// * `path` - 页面路径，写入结果
    ///
    /// # 返回值
    ///
    /// 成功或失败的页面结果
    #[instrument(skip(self, session, url), fields(url = %url))]
    pub async fn scan_page(&self, session: &dyn BrowserSession, url: &str, path: &str) -> WebpageResult {
        let mut context = match session.open_context().await {
            Ok(context) => context,
            Err(e) => {
                warn!("Failed to open browser context: {}", e);
                return self.failed(path, e);
            }
        };

        let outcome = match timeout(self.page_timeout, Self::run(context.as_mut(), url)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(EngineError::Timeout(self.page_timeout.as_secs())),
        };

        // The context is disposed whatever the outcome
        if let Err(e) = context.close().await {
            warn!("Failed to close browser context: {}", e);
        }

        let output = match outcome {
            Ok(output) => output,
            Err(e) => {
                warn!("Page scan failed: {}", e);
                return self.failed(path, e);
            }
        };

        match format_engine_output(path, &output) {
            Ok(page) => {
                counter!("scan_pages_total", "status" => "success").increment(1);
                info!("Page scanned, {} rules", page.rules.len());
                page
            }
            Err(e) => {
                warn!("Engine output could not be formatted: {}", e);
                self.failed(path, FailureCause::from_error(&e))
            }
        }
    }

    async fn run(context: &mut dyn PageContext, url: &str) -> Result<EngineOutput, EngineError> {
        context.navigate(url).await?;

        match context.analyze().await {
            Ok(output) => Ok(output),
            Err(e) if is_transient_navigation_error(&e) => {
                // The page navigated away mid-analysis; one retry once it settles
                debug!("Transient navigation error, retrying analysis: {}", e);
                counter!("scan_navigation_retries_total").increment(1);
                context.wait_for_navigation().await?;
                context.analyze().await
            }
            Err(e) => Err(e),
        }
    }

    fn failed(&self, path: &str, cause: impl Into<FailureCause>) -> WebpageResult {
        counter!("scan_pages_total", "status" => "failed").increment(1);
        format_failure(path, cause)
    }
}
