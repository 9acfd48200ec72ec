// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

use crate::engines::traits::EngineError;

/// 在页面中运行引擎并返回可序列化结果的表达式
///
/// 非 Error 的拒绝值按引用回传时没有内容，因此在页面内先编码为 JSON 字符串。
pub const RUN_EXPRESSION: &str =
    "axe.run(document).catch((e) => { throw e instanceof Error ? e : (JSON.stringify(e) ?? 'null'); })";

/// 注入页面的无障碍引擎脚本
///
/// 首次使用时从磁盘读取并缓存，读取失败不会被缓存，下一个任务会重新尝试。
#[derive(Debug)]
pub struct EngineScript {
    path: PathBuf,
    source: OnceCell<Arc<str>>,
}

impl EngineScript {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            source: OnceCell::new(),
        }
    }

    /// 获取脚本内容
    pub async fn source(&self) -> Result<Arc<str>, EngineError> {
        self.source
            .get_or_try_init(|| async {
                let source = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
                    EngineError::Script(format!("{}: {}", self.path.display(), e))
                })?;
                if source.trim().is_empty() {
                    return Err(EngineError::Script(format!(
                        "{}: file is empty",
                        self.path.display()
                    )));
                }
                info!("Loaded engine script from {} ({} bytes)", self.path.display(), source.len());
                Ok(Arc::from(source))
            })
            .await
            .cloned()
    }
}
