// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use thiserror::Error;
use tracing::{info, warn};

/// 指标初始化错误
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Invalid metrics address '{0}': {1}")]
    InvalidAddress(String, std::net::AddrParseError),
}

/// 注册扫描流水线使用的指标说明
pub fn describe_metrics() {
    describe_counter!("scan_jobs_total", "Total number of scan jobs received");
    describe_counter!(
        "scan_jobs_failed_total",
        "Total number of scan jobs that failed at the website level"
    );
    describe_counter!(
        "scan_pages_total",
        "Total number of scanned pages, labelled by status"
    );
    describe_counter!(
        "scan_navigation_retries_total",
        "Total number of analysis retries after a transient navigation error"
    );
    describe_histogram!(
        "scan_job_duration_seconds",
        Unit::Seconds,
        "Duration of scan jobs in seconds"
    );
    describe_counter!(
        "broker_reconnects_total",
        "Total number of broker reconnect attempts"
    );
}

/// 启动 Prometheus 导出器
///
/// # 参数
///
/// * `listen_addr` - 导出器监听地址，例如 `0.0.0.0:9000`
pub fn init_metrics(listen_addr: &str) -> Result<(), MetricsError> {
    let addr: SocketAddr = listen_addr
        .parse()
        .map_err(|e| MetricsError::InvalidAddress(listen_addr.to_string(), e))?;

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return Ok(());
    }

    describe_metrics();
    info!("Metrics exporter listening on {}", addr);
    Ok(())
}
