// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use metrics::{counter, histogram};
use tracing::{error, info, instrument, warn};

use crate::application::usecases::scan_page::ScanExecutor;
use crate::domain::models::scan_job::ScanJob;
use crate::domain::models::scan_result::WebsiteResult;
use crate::engines::traits::BrowserEngine;

/// 网站扫描用例
///
/// 每个任务启动一次浏览器，所有页面并发扫描，结果按路径顺序返回。
pub struct WebsiteScanner {
    engine: Arc<dyn BrowserEngine>,
    executor: ScanExecutor,
}

impl WebsiteScanner {
    pub fn new(engine: Arc<dyn BrowserEngine>, executor: ScanExecutor) -> Self {
        Self { engine, executor }
    }

    /// 扫描任务中的全部页面
    ///
    /// 浏览器无法启动时返回网站级失败结果；单个页面的失败只影响该页面。
    #[instrument(skip(self, job), fields(job_id = job.job_id, website = %job.website_base_url, pages = job.webpage_paths.len()))]
    pub async fn scan_website(&self, job: &ScanJob) -> WebsiteResult {
        counter!("scan_jobs_total").increment(1);
        let started = Instant::now();

        if job.webpage_paths.is_empty() {
            info!("Job has no pages, nothing to scan");
            return WebsiteResult::success(job, Vec::new());
        }

        if !job.is_well_formed() {
            warn!("Job does not follow the base url / path convention");
        }

        let session = match self.engine.launch().await {
            Ok(session) => session,
            Err(e) => {
                error!("Failed to launch {} engine: {}", self.engine.name(), e);
                counter!("scan_jobs_failed_total").increment(1);
                return WebsiteResult::failed(e);
            }
        };

        let scans = job.webpage_paths.iter().map(|path| {
            let url = job.page_url(path);
            let session = session.clone();
            async move { self.executor.scan_page(session.as_ref(), &url, path).await }
        });
        let webpages = join_all(scans).await;

        if let Err(e) = session.shutdown().await {
            warn!("Failed to shut down browser session: {}", e);
        }

        let failed = webpages.iter().filter(|page| !page.is_success()).count();
        histogram!("scan_job_duration_seconds").record(started.elapsed().as_secs_f64());
        info!(
            "Job scanned in {:?}, {} of {} pages failed",
            started.elapsed(),
            failed,
            webpages.len()
        );

        WebsiteResult::success(job, webpages)
    }
}
