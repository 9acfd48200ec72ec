// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 单个页面的评分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageScore {
    /// 持久化层中的页面ID
    pub id: i64,
    pub path: String,
    /// 0 到 100，100 表示没有加权违规
    pub score: f64,
    /// 通过数与加权违规数之和，用作汇总时的权重
    pub total_count: u64,
}

/// 网站评分，由页面评分按 `total_count` 加权平均得到
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteScore {
    pub score: f64,
    pub pages: Vec<PageScore>,
}
