// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 扫描任务
///
/// 由任务下发方（CRUD 后端）创建并投递到任务队列，
/// 描述一个网站的基础地址以及需要扫描的页面路径。
/// 一经投递即不可变，由某个工作器恰好消费一次。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanJob {
    /// 消息模型版本
    pub model_version: String,
    /// 任务ID
    pub job_id: i64,
    /// 任务创建时间
    pub job_timestamp: DateTime<Utc>,
    /// 网站基础地址（不带结尾斜杠）
    pub website_base_url: String,
    /// 页面路径列表（均以 "/" 开头），顺序即结果顺序
    pub webpage_paths: Vec<String>,
}

impl ScanJob {
    /// 拼接页面的完整地址
    ///
    /// 任务下发方保证基础地址不以 "/" 结尾且路径以 "/" 开头，
    /// 这里只做简单拼接，不合法的组合交由导航阶段报错。
    pub fn page_url(&self, path: &str) -> String {
        format!("{}{}", self.website_base_url, path)
    }

    /// 判断任务是否满足下发方的地址约定
    pub fn is_well_formed(&self) -> bool {
        !self.website_base_url.ends_with('/')
            && self.webpage_paths.iter().all(|path| path.starts_with('/'))
    }
}
