// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::models::scan_result::{CheckType, Impact};

/// 无障碍引擎对单个页面的原始输出
///
/// 结构与 axe-core 的 `axe.run()` 结果一致，未识别的字段会被忽略。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineOutput {
    #[serde(default)]
    pub passes: Vec<RuleOccurrence>,
    #[serde(default)]
    pub violations: Vec<RuleOccurrence>,
    #[serde(default)]
    pub incomplete: Vec<RuleOccurrence>,
    #[serde(default)]
    pub inapplicable: Vec<RuleOccurrence>,
}

/// 某条规则在一个结果分类下的一次出现
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleOccurrence {
    pub id: String,
    #[serde(default)]
    pub nodes: Vec<NodeOccurrence>,
}

/// 规则针对单个元素的评估
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeOccurrence {
    #[serde(default)]
    pub target: Value,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub any: Vec<CheckOccurrence>,
    #[serde(default)]
    pub all: Vec<CheckOccurrence>,
    #[serde(default)]
    pub none: Vec<CheckOccurrence>,
}

impl NodeOccurrence {
    /// 按 any、all、none 的顺序遍历该元素上的全部检查
    pub fn checks(&self) -> impl Iterator<Item = (CheckType, &CheckOccurrence)> {
        self.any
            .iter()
            .map(|c| (CheckType::Any, c))
            .chain(self.all.iter().map(|c| (CheckType::All, c)))
            .chain(self.none.iter().map(|c| (CheckType::None, c)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOccurrence {
    pub id: String,
    #[serde(default)]
    pub impact: Option<Impact>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub related_nodes: Vec<RelatedNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedNode {
    #[serde(default)]
    pub target: Value,
    #[serde(default)]
    pub html: String,
}
