// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// Chromium 引擎集成测试
///
/// 需要本机安装 Chrome/Chromium，默认忽略
#[cfg(test)]
mod tests {
    use scanrs::application::usecases::scan_page::ScanExecutor;
    use scanrs::config::settings::BrowserSettings;
    use scanrs::domain::models::scan_result::ScanStatus;
    use scanrs::engines::chromium_engine::ChromiumEngine;
    use scanrs::engines::engine_script::EngineScript;
    use scanrs::engines::traits::BrowserEngine;
    use std::io::Write;
    use std::time::Duration;

    // Stand-in engine reporting one violation on the document body
    const STUB_ENGINE: &str = r#"
        window.axe = {
            run: async () => ({
                passes: [],
                violations: [{
                    id: "stub-rule",
                    nodes: [{
                        target: ["body"],
                        html: document.body.outerHTML,
                        any: [{ id: "stub-check", impact: "moderate", message: "stub", data: null, relatedNodes: [] }],
                        all: [],
                        none: []
                    }]
                }],
                incomplete: [],
                inapplicable: []
            })
        };
    "#;

    const THROWING_ENGINE: &str = r#"
        window.axe = { run: async () => { throw { someProperty: "x" }; } };
    "#;

    fn engine(script: &str) -> (ChromiumEngine, tempfile::NamedTempFile) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(script.as_bytes()).unwrap();
        let settings = BrowserSettings {
            remote_url: std::env::var("CHROME_REMOTE_URL").ok(),
            no_sandbox: true,
            request_timeout_secs: 30,
        };
        (ChromiumEngine::new(settings, EngineScript::new(file.path())), file)
    }

    #[tokio::test]
    #[ignore]
    async fn test_chromium_scans_a_page() {
        let (engine, _script) = engine(STUB_ENGINE);
        let session = engine.launch().await.unwrap();

        let page = ScanExecutor::new(Duration::from_secs(30))
            .scan_page(session.as_ref(), "data:text/html,<main>hello</main>", "/")
            .await;
        session.shutdown().await.unwrap();

        assert_eq!(page.scan_status, ScanStatus::Success, "{:?}", page.error_message);
        assert_eq!(page.rules.len(), 1);
        assert_eq!(page.rules[0].checks[0].violated_count, 1);
        assert!(page.rules[0].checks[0].violating_elements[0].html.contains("hello"));
    }

    #[tokio::test]
    #[ignore]
    async fn test_chromium_thrown_object_becomes_json_message() {
        let (engine, _script) = engine(THROWING_ENGINE);
        let session = engine.launch().await.unwrap();

        let page = ScanExecutor::new(Duration::from_secs(30))
            .scan_page(session.as_ref(), "data:text/html,<p>x</p>", "/")
            .await;
        session.shutdown().await.unwrap();

        assert_eq!(page.scan_status, ScanStatus::Failed);
        assert_eq!(page.error_message.as_deref(), Some(r#"{"someProperty":"x"}"#));
    }
}
