// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 单页面扫描执行器测试
///
/// 覆盖成功路径、导航瞬时错误的单次重试、失败路径和超时
#[cfg(test)]
mod tests {
    use crate::integration::helpers::fake_engine::{FakeEngine, PageBehavior, CONTEXT_DESTROYED};
    use crate::integration::helpers::fixtures::sample_output;
    use scanrs::application::usecases::scan_page::ScanExecutor;
    use scanrs::domain::models::scan_result::ScanStatus;
    use scanrs::engines::traits::{BrowserEngine, EngineError};
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    const URL: &str = "https://example.test/about";

    fn executor() -> ScanExecutor {
        ScanExecutor::new(Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_successful_scan_formats_engine_output() {
        let engine = FakeEngine::new([(URL, PageBehavior::Output(sample_output("label")))]);
        let session = engine.launch().await.unwrap();

        let page = executor().scan_page(session.as_ref(), URL, "/about").await;

        assert_eq!(page.path, "/about");
        assert_eq!(page.scan_status, ScanStatus::Success);
        assert!(page.error_message.is_none());
        let ids: Vec<_> = page.rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["document-title", "label", "video-caption"]);
        assert_eq!(engine.stats.contexts_opened.load(Ordering::SeqCst), 1);
        assert_eq!(engine.stats.contexts_closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_navigation_error_is_retried_once() {
        let engine = FakeEngine::new([(URL, PageBehavior::TransientOnce(sample_output("label")))]);
        let session = engine.launch().await.unwrap();

        let page = executor().scan_page(session.as_ref(), URL, "/about").await;

        assert!(page.is_success());
        assert_eq!(engine.stats.analyses_of(URL), 2);
        assert_eq!(engine.stats.navigation_waits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_second_transient_error_fails_the_page() {
        let engine = FakeEngine::new([(URL, PageBehavior::AlwaysTransient)]);
        let session = engine.launch().await.unwrap();

        let page = executor().scan_page(session.as_ref(), URL, "/about").await;

        assert_eq!(page.scan_status, ScanStatus::Failed);
        assert_eq!(page.error_message.as_deref(), Some(CONTEXT_DESTROYED));
        assert!(page.rules.is_empty());
        assert_eq!(engine.stats.analyses_of(URL), 2);
        assert_eq!(engine.stats.contexts_closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let engine = FakeEngine::new([(
            URL,
            PageBehavior::Fail(EngineError::Analysis("axe is not defined".to_string())),
        )]);
        let session = engine.launch().await.unwrap();

        let page = executor().scan_page(session.as_ref(), URL, "/about").await;

        assert_eq!(page.error_message.as_deref(), Some("axe is not defined"));
        assert_eq!(engine.stats.analyses_of(URL), 1);
        assert_eq!(engine.stats.navigation_waits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_thrown_object_is_serialized_as_json() {
        let engine = FakeEngine::new([(
            URL,
            PageBehavior::Fail(EngineError::Thrown(json!({ "someProperty": "x" }))),
        )]);
        let session = engine.launch().await.unwrap();

        let page = executor().scan_page(session.as_ref(), URL, "/about").await;

        assert_eq!(page.error_message.as_deref(), Some(r#"{"someProperty":"x"}"#));
    }

    #[tokio::test]
    async fn test_navigation_failure_is_page_scoped() {
        let engine = FakeEngine::default();
        let session = engine.launch().await.unwrap();

        let page = executor()
            .scan_page(session.as_ref(), "https://nope.invalid/x", "/x")
            .await;

        assert_eq!(page.scan_status, ScanStatus::Failed);
        assert_eq!(
            page.error_message.as_deref(),
            Some("net::ERR_NAME_NOT_RESOLVED at https://nope.invalid/x")
        );
        assert_eq!(engine.stats.contexts_closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_page_times_out() {
        let engine = FakeEngine::new([(URL, PageBehavior::Hang)]);
        let session = engine.launch().await.unwrap();

        let page = ScanExecutor::new(Duration::from_secs(5))
            .scan_page(session.as_ref(), URL, "/about")
            .await;

        assert_eq!(page.scan_status, ScanStatus::Failed);
        assert_eq!(page.error_message.as_deref(), Some("Timeout after 5 seconds"));
        assert_eq!(engine.stats.contexts_closed.load(Ordering::SeqCst), 1);
    }
}
