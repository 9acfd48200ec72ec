// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::models::failure::FailureCause;
use crate::domain::models::scan_job::ScanJob;

/// 合成失败结果所使用的模型版本
pub const RESULT_MODEL_VERSION: &str = "1.0.0";

/// 网站未知时使用的占位名称
pub const UNKNOWN_WEBSITE: &str = "N/A";

/// 扫描状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    /// 扫描成功
    Success,
    /// 扫描失败
    Failed,
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScanStatus::Success => write!(f, "success"),
            ScanStatus::Failed => write!(f, "failed"),
        }
    }
}

/// 检查项所属的分组类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckType {
    All,
    Any,
    None,
}

/// 检查项的严重程度
///
/// 同时作为评分时的权重等级。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    #[default]
    Minor,
    Moderate,
    Serious,
    Critical,
}

/// 网站扫描结果
///
/// 每个被接受的任务恰好产生一条结果消息。
/// `error_message` 仅在失败时存在，网站级失败时 `webpages` 为空。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteResult {
    pub model_version: String,
    pub job_id: i64,
    pub website: String,
    pub scan_timestamp: DateTime<Utc>,
    pub scan_status: ScanStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub webpages: Vec<WebpageResult>,
}

impl WebsiteResult {
    /// 根据任务和按路径顺序排列的页面结果构建成功结果
    pub fn success(job: &ScanJob, webpages: Vec<WebpageResult>) -> Self {
        Self {
            model_version: job.model_version.clone(),
            job_id: job.job_id,
            website: job.website_base_url.clone(),
            scan_timestamp: Utc::now(),
            scan_status: ScanStatus::Success,
            error_message: None,
            webpages,
        }
    }

    /// 构建网站级失败结果
    ///
    /// 失败结果不关联具体任务：`job_id` 为 0，`website` 为 "N/A"。
    pub fn failed(cause: impl Into<FailureCause>) -> Self {
        Self {
            model_version: RESULT_MODEL_VERSION.to_string(),
            job_id: 0,
            website: UNKNOWN_WEBSITE.to_string(),
            scan_timestamp: Utc::now(),
            scan_status: ScanStatus::Failed,
            error_message: Some(cause.into().describe()),
            webpages: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.scan_status == ScanStatus::Success
    }
}

/// 单个页面的扫描结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebpageResult {
    pub path: String,
    pub scan_status: ScanStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub rules: Vec<Rule>,
}

impl WebpageResult {
    pub fn success(path: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            path: path.into(),
            scan_status: ScanStatus::Success,
            error_message: None,
            rules,
        }
    }

    /// 构建页面级失败结果，规则列表始终为空
    pub fn failed(path: impl Into<String>, cause: impl Into<FailureCause>) -> Self {
        Self {
            path: path.into(),
            scan_status: ScanStatus::Failed,
            error_message: Some(cause.into().describe()),
            rules: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.scan_status == ScanStatus::Success
    }
}

/// 无障碍规则，同一页面内每个规则ID最多出现一次
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub checks: Vec<Check>,
}

/// 规则下的单项检查及其统计
///
/// 不变式：`tested_count = passed_count + violated_count + incomplete_count`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Check {
    pub id: String,
    #[serde(rename = "type")]
    pub check_type: CheckType,
    pub impact: Impact,
    pub tested_count: u64,
    pub passed_count: u64,
    pub violated_count: u64,
    pub incomplete_count: u64,
    pub violating_elements: Vec<CheckElement>,
    pub incomplete_elements: Vec<CheckElement>,
}

/// 违规或未完成检查所涉及的元素
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckElement {
    /// 序列化后的选择器
    pub target: String,
    pub html: String,
    pub issue_description: String,
    /// 序列化后的检查附加数据
    pub data: String,
    pub related_elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub target: String,
    pub html: String,
}
