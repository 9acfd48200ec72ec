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

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::models::engine_output::EngineOutput;
use crate::domain::models::failure::FailureCause;

/// 引擎错误类型
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    /// 浏览器无法启动或连接
    #[error("Browser launch failed: {0}")]
    Launch(String),
    /// 引擎脚本不可用
    #[error("Engine script unavailable: {0}")]
    Script(String),
    /// 无法创建隔离的浏览上下文
    #[error("Browser context error: {0}")]
    Context(String),
    /// 导航失败
    #[error("{0}")]
    Navigation(String),
    /// 分析失败
    #[error("{0}")]
    Analysis(String),
    /// 页面内抛出的非 Error 值
    #[error("Page threw a value: {0}")]
    Thrown(Value),
    /// 超时
    #[error("Timeout after {0} seconds")]
    Timeout(u64),
}

impl From<&EngineError> for FailureCause {
    fn from(error: &EngineError) -> Self {
        match error {
            EngineError::Thrown(value) => FailureCause::Payload(value.clone()),
            other => FailureCause::from_error(other),
        }
    }
}

impl From<EngineError> for FailureCause {
    fn from(error: EngineError) -> Self {
        FailureCause::from(&error)
    }
}

/// 无障碍扫描引擎特质
///
/// 每个任务启动一次，得到的会话在该任务的所有页面之间共享。
#[async_trait]
pub trait BrowserEngine: Send + Sync {
    /// 启动浏览器会话
    async fn launch(&self) -> Result<Arc<dyn BrowserSession>, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}

/// 一个任务内共享的浏览器会话
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// 打开一个隔离的页面上下文，不与其它页面共享 Cookie 和存储
    async fn open_context(&self) -> Result<Box<dyn PageContext>, EngineError>;

    /// 关闭会话及其浏览器进程
    async fn shutdown(&self) -> Result<(), EngineError>;
}

/// 单个页面独占的浏览上下文
#[async_trait]
pub trait PageContext: Send {
    /// 导航到指定地址并等待加载完成
    async fn navigate(&mut self, url: &str) -> Result<(), EngineError>;

    /// 在当前页面运行无障碍引擎
    async fn analyze(&mut self) -> Result<EngineOutput, EngineError>;

    /// 等待下一次导航完成
    async fn wait_for_navigation(&mut self) -> Result<(), EngineError>;

    /// 销毁上下文
    async fn close(self: Box<Self>) -> Result<(), EngineError>;
}
