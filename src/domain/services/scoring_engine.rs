// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scan_result::{Impact, WebpageResult, WebsiteResult};
use crate::domain::models::scoring::{PageScore, WebsiteScore};

/// 没有任何证据时的满分
const PERFECT_SCORE: f64 = 100.0;

impl Impact {
    /// 评分权重
    pub fn weight(self) -> u64 {
        match self {
            Impact::Minor => 2,
            Impact::Moderate => 4,
            Impact::Serious => 8,
            Impact::Critical => 16,
        }
    }
}

/// 评分引擎
///
/// 在结果持久化之后计算页面评分与网站评分。
/// 页面评分：`100 - 加权违规数 / (加权违规数 + 通过数) * 100`，
/// 网站评分：以 `total_count` 为权重的页面评分加权平均。
#[derive(Debug, Default, Clone, Copy)]
pub struct ScoringEngine;

/// 单页统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageTally {
    pub weighted_violated: u64,
    pub passed: u64,
}

impl PageTally {
    pub fn of(page: &WebpageResult) -> Self {
        page.rules
            .iter()
            .flat_map(|rule| rule.checks.iter())
            .fold(Self::default(), |tally, check| Self {
                weighted_violated: tally.weighted_violated
                    + check.violated_count * check.impact.weight(),
                passed: tally.passed + check.passed_count,
            })
    }

    pub fn total_count(&self) -> u64 {
        self.passed + self.weighted_violated
    }

    /// 没有任何测试结果时视为满分（权重同时为 0）
    pub fn score(&self) -> f64 {
        let total = self.total_count();
        if total == 0 {
            return PERFECT_SCORE;
        }
        PERFECT_SCORE - self.weighted_violated as f64 / total as f64 * PERFECT_SCORE
    }
}

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    /// 计算单个页面的评分
    ///
    /// # 参数
    ///
    /// * `id` - 持久化层中的页面ID
    /// * `page` - 页面扫描结果
    pub fn score_page(&self, id: i64, page: &WebpageResult) -> PageScore {
        let tally = PageTally::of(page);
        PageScore {
            id,
            path: page.path.clone(),
            score: tally.score(),
            total_count: tally.total_count(),
        }
    }

    /// 计算一组已持久化页面的评分
    pub fn score_pages<'a, I>(&self, pages: I) -> Vec<PageScore>
    where
        I: IntoIterator<Item = (i64, &'a WebpageResult)>,
    {
        pages
            .into_iter()
            .map(|(id, page)| self.score_page(id, page))
            .collect()
    }

    /// 以页面的 `total_count` 为权重汇总网站评分
    ///
    /// 全部页面权重为 0 时返回满分。
    pub fn aggregate(&self, pages: &[PageScore]) -> f64 {
        let weight_sum: u64 = pages.iter().map(|p| p.total_count).sum();
        if weight_sum == 0 {
            return PERFECT_SCORE;
        }
        pages
            .iter()
            .map(|p| p.score * (p.total_count as f64 / weight_sum as f64))
            .sum()
    }

    /// 计算网站结果的评分
    ///
    /// 页面ID取其在结果中的位置。需要持久化ID时使用 `score_pages`。
    pub fn score_website(&self, result: &WebsiteResult) -> WebsiteScore {
        let pages = self.score_pages(
            result
                .webpages
                .iter()
                .enumerate()
                .map(|(index, page)| (index as i64, page)),
        );
        WebsiteScore {
            score: self.aggregate(&pages),
            pages,
        }
    }
}
