// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 评分测试
///
/// 从原始引擎输出经结果整理后计算评分
#[cfg(test)]
mod tests {
    use scanrs::domain::models::engine_output::EngineOutput;
    use scanrs::domain::models::scan_result::{WebpageResult, WebsiteResult};
    use scanrs::domain::services::result_formatter::{format_engine_output, format_failure};
    use scanrs::domain::services::scoring_engine::ScoringEngine;
    use serde_json::json;

    fn page(path: &str, impact: &str, passes: usize, violations: usize) -> WebpageResult {
        let node = |i: usize| {
            json!({
                "target": [format!("#n{}", i)],
                "html": format!("<div id=\"n{}\">", i),
                "any": [{ "id": "color-contrast", "impact": impact, "message": "contrast", "data": {}, "relatedNodes": [] }]
            })
        };
        let output: EngineOutput = serde_json::from_value(json!({
            "passes": [{ "id": "color-contrast", "nodes": (0..passes).map(node).collect::<Vec<_>>() }],
            "violations": [{ "id": "color-contrast", "nodes": (0..violations).map(node).collect::<Vec<_>>() }]
        }))
        .unwrap();
        format_engine_output(path, &output).unwrap()
    }

    fn website(webpages: Vec<WebpageResult>) -> WebsiteResult {
        WebsiteResult {
            model_version: "2.1.0".to_string(),
            job_id: 1,
            website: "https://example.test".to_string(),
            scan_timestamp: "2025-03-01T12:00:00Z".parse().unwrap(),
            scan_status: scanrs::domain::models::scan_result::ScanStatus::Success,
            error_message: None,
            webpages,
        }
    }

    #[test]
    fn test_impact_weights_scale_violations() {
        let engine = ScoringEngine::new();
        // 6 passed, 1 serious violation: 8 / 14 weighted
        let score = engine.score_page(1, &page("/", "serious", 6, 1));
        assert_eq!(score.total_count, 14);
        assert!((score.score - (100.0 - 8.0 / 14.0 * 100.0)).abs() < 1e-9);

        let minor = engine.score_page(2, &page("/", "minor", 6, 1));
        assert!(minor.score > score.score);
    }

    #[test]
    fn test_clean_page_scores_full_marks() {
        let score = ScoringEngine::new().score_page(3, &page("/clean", "critical", 10, 0));
        assert_eq!(score.score, 100.0);
        assert_eq!(score.total_count, 10);
    }

    #[test]
    fn test_site_score_is_weighted_by_total_count() {
        let result = website(vec![
            page("/a", "moderate", 4, 1),  // total 8, score 50
            page("/b", "moderate", 24, 0), // total 24, score 100
            format_failure("/c", "Timeout after 60 seconds"),
        ]);

        let score = ScoringEngine::new().score_website(&result);

        assert_eq!(score.pages.len(), 3);
        assert_eq!(score.pages[0].score, 50.0);
        assert_eq!(score.pages[2].total_count, 0);
        assert_eq!(score.pages[2].score, 100.0);
        assert!((score.score - (50.0 * 8.0 + 100.0 * 24.0) / 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_persisted_ids_are_kept() {
        let a = page("/a", "minor", 1, 1);
        let b = page("/b", "minor", 1, 0);
        let scores = ScoringEngine::new().score_pages([(101, &a), (205, &b)]);
        let ids: Vec<_> = scores.iter().map(|s| (s.id, s.path.as_str())).collect();
        assert_eq!(ids, vec![(101, "/a"), (205, "/b")]);
    }

    #[test]
    fn test_site_without_evidence_scores_full_marks() {
        let result = website(vec![format_failure("/", "boom")]);
        assert_eq!(ScoringEngine::new().score_website(&result).score, 100.0);
        assert_eq!(ScoringEngine::new().aggregate(&[]), 100.0);
    }
}
