// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use scanrs::application::usecases::scan_page::ScanExecutor;
use scanrs::application::usecases::scan_website::WebsiteScanner;
use scanrs::config::settings::Settings;
use scanrs::engines::chromium_engine::ChromiumEngine;
use scanrs::engines::engine_script::EngineScript;
use scanrs::engines::traits::BrowserEngine;
use scanrs::queue::message_broker::BrokerConnector;
use scanrs::queue::redis_broker::RedisConnector;
use scanrs::workers::scan_worker::ScanWorker;
use scanrs::workers::supervisor::BrokerSupervisor;
use scanrs::workers::Worker;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use scanrs::utils::telemetry;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动重连循环
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting scanrs...");

    // 2. Load configuration, fatal before any connection attempt
    let settings = Settings::new()?;
    info!("Configuration loaded: {:?}", settings.broker);

    // Initialize Prometheus Metrics
    match settings.metrics.listen_addr.as_deref() {
        Some(addr) => scanrs::infrastructure::metrics::init_metrics(addr)?,
        None => scanrs::infrastructure::metrics::describe_metrics(),
    }

    // 3. Initialize the browser engine
    let script = EngineScript::new(&settings.scan.engine_script_path);
    let engine: Arc<dyn BrowserEngine> = Arc::new(ChromiumEngine::new(settings.browser.clone(), script));
    info!("Browser engine '{}' initialized", engine.name());

    // 4. Wire the pipeline
    let executor = ScanExecutor::new(settings.scan.page_timeout());
    let scanner = Arc::new(WebsiteScanner::new(engine, executor));
    let worker = ScanWorker::new(scanner, settings.broker.poll_interval());
    // The worker id names this process's processing list across reconnects
    let connector: Arc<dyn BrokerConnector> =
        Arc::new(RedisConnector::new(settings.broker.clone(), worker.worker_id()));
    info!("Broker target: {}", connector.target());

    let supervisor = BrokerSupervisor::new(connector, worker, settings.broker.reconnect_delay());

    // 5. Run until terminated
    tokio::select! {
        result = supervisor.run() => {
            if let Err(e) = result {
                error!("{} stopped: {}", supervisor.name(), e);
            }
        }
        signal = signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("Shutdown signal received"),
                Err(err) => error!("Unable to listen for shutdown signal: {}", err),
            }
        }
    }

    info!("scanrs stopped");
    Ok(())
}
