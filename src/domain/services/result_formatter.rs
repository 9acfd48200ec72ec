// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use crate::domain::models::engine_output::{
    CheckOccurrence, EngineOutput, NodeOccurrence, RuleOccurrence,
};
use crate::domain::models::failure::FailureCause;
use crate::domain::models::scan_result::{
    Check, CheckElement, CheckType, Element, Rule, WebpageResult,
};

/// 格式化错误
#[derive(Error, Debug, PartialEq)]
pub enum FormatError {
    /// 分组后的检查组为空，属于程序错误，不应重试
    #[error("Malformed engine output: check group '{check_id}' of rule '{rule_id}' is empty")]
    MalformedEngineOutput { rule_id: String, check_id: String },
}

/// 引擎对一次规则出现的分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Violated,
    Incomplete,
    Inapplicable,
}

/// 同一规则ID下的全部出现
#[derive(Debug)]
pub struct RuleGroup<'a> {
    pub rule_id: &'a str,
    pub occurrences: Vec<(Outcome, &'a RuleOccurrence)>,
}

/// 一次检查在某个元素上的评估记录
#[derive(Debug, Clone, Copy)]
pub struct CheckRecord<'a> {
    pub outcome: Outcome,
    pub check_type: CheckType,
    pub node: &'a NodeOccurrence,
    pub check: &'a CheckOccurrence,
}

/// 同一检查ID下的全部评估记录
#[derive(Debug)]
pub struct CheckGroup<'a> {
    pub check_id: &'a str,
    pub records: Vec<CheckRecord<'a>>,
}

/// 第一遍分组：按规则ID聚合所有分类下的出现，保留首次出现的顺序
pub fn group_by_rule(output: &EngineOutput) -> Vec<RuleGroup<'_>> {
    let classified = [
        (Outcome::Passed, &output.passes),
        (Outcome::Violated, &output.violations),
        (Outcome::Incomplete, &output.incomplete),
        (Outcome::Inapplicable, &output.inapplicable),
    ];

    let mut groups: Vec<RuleGroup<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (outcome, occurrences) in classified {
        for occurrence in occurrences {
            let slot = *index.entry(occurrence.id.as_str()).or_insert_with(|| {
                groups.push(RuleGroup {
                    rule_id: occurrence.id.as_str(),
                    occurrences: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].occurrences.push((outcome, occurrence));
        }
    }

    groups
}

/// 第二遍分组：在一个规则组内按检查ID聚合所有元素上的评估
///
/// 不适用（inapplicable）的出现不携带检查，在此处被丢弃。
pub fn group_by_check<'a>(group: &RuleGroup<'a>) -> Vec<CheckGroup<'a>> {
    let mut checks: Vec<CheckGroup<'a>> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for &(outcome, occurrence) in &group.occurrences {
        if outcome == Outcome::Inapplicable {
            continue;
        }
        for node in &occurrence.nodes {
            for (check_type, check) in node.checks() {
                let slot = *index.entry(check.id.as_str()).or_insert_with(|| {
                    checks.push(CheckGroup {
                        check_id: check.id.as_str(),
                        records: Vec::new(),
                    });
                    checks.len() - 1
                });
                checks[slot].records.push(CheckRecord {
                    outcome,
                    check_type,
                    node,
                    check,
                });
            }
        }
    }

    checks
}

/// 将一个检查组折叠为带统计的 `Check`
fn build_check(rule_id: &str, group: &CheckGroup<'_>) -> Result<Check, FormatError> {
    let first = group
        .records
        .first()
        .ok_or_else(|| FormatError::MalformedEngineOutput {
            rule_id: rule_id.to_string(),
            check_id: group.check_id.to_string(),
        })?;

    let mut check = Check {
        id: group.check_id.to_string(),
        check_type: first.check_type,
        impact: first.check.impact.unwrap_or_default(),
        tested_count: 0,
        passed_count: 0,
        violated_count: 0,
        incomplete_count: 0,
        violating_elements: Vec::new(),
        incomplete_elements: Vec::new(),
    };

    for record in &group.records {
        match record.outcome {
            Outcome::Passed => check.passed_count += 1,
            Outcome::Violated => {
                check.violated_count += 1;
                check.violating_elements.push(build_element(record));
            }
            Outcome::Incomplete => {
                check.incomplete_count += 1;
                check.incomplete_elements.push(build_element(record));
            }
            // group_by_check never emits these
            Outcome::Inapplicable => continue,
        }
        check.tested_count += 1;
    }

    Ok(check)
}

fn build_element(record: &CheckRecord<'_>) -> CheckElement {
    CheckElement {
        target: serialize(&record.node.target),
        html: record.node.html.clone(),
        issue_description: record.check.message.clone(),
        data: serialize(&record.check.data),
        related_elements: record
            .check
            .related_nodes
            .iter()
            .map(|related| Element {
                target: serialize(&related.target),
                html: related.html.clone(),
            })
            .collect(),
    }
}

fn serialize(value: &Value) -> String {
    value.to_string()
}

/// 将引擎原始输出格式化为页面结果
///
/// # 参数
///
/// * `path` - 页面路径
/// * `output` - 引擎原始输出
///
/// # 返回值
///
/// * `Ok(WebpageResult)` - 状态为成功的页面结果
/// * `Err(FormatError)` - 分组结果违反内部不变式
pub fn format_engine_output(path: &str, output: &EngineOutput) -> Result<WebpageResult, FormatError> {
    let mut rules = Vec::new();

    for rule_group in group_by_rule(output) {
        let checks = group_by_check(&rule_group)
            .iter()
            .map(|check_group| build_check(rule_group.rule_id, check_group))
            .collect::<Result<Vec<_>, _>>()?;

        rules.push(Rule {
            id: rule_group.rule_id.to_string(),
            checks,
        });
    }

    Ok(WebpageResult::success(path, rules))
}

/// 扫描失败时构建页面结果，原始错误不会越过这一边界
pub fn format_failure(path: &str, cause: impl Into<FailureCause>) -> WebpageResult {
    WebpageResult::failed(path, cause)
}
