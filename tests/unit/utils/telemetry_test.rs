// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use scanrs::domain::models::scan_result::WebsiteResult;
    use scanrs::utils::telemetry::{self, LogFormat};
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn test_default_filter_targets_crate() {
        assert_eq!(telemetry::DEFAULT_FILTER, "info,scanrs=debug");
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("text"), LogFormat::Text);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Text);
        assert_eq!(LogFormat::default(), LogFormat::Text);
    }

    #[test]
    fn test_json_layer_logs_through_scoped_subscriber() {
        let subscriber = tracing_subscriber::registry()
            .with(telemetry::env_filter())
            .with(tracing_subscriber::fmt::layer().json().with_test_writer());

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(job_id = 7, "Scan job completed");
        });
    }

    #[test]
    fn test_components_log_through_scoped_subscriber() {
        // 组件不持有日志器，作用域内的订阅器即可接收日志
        let subscriber = tracing_subscriber::registry()
            .with(telemetry::env_filter())
            .with(tracing_subscriber::fmt::layer().with_test_writer());

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(job_id = 42, "Scan job completed");
            let result = WebsiteResult::failed("broker unavailable");
            tracing::warn!(status = %result.scan_status, "Published failure result");
            assert!(!result.is_success());
        });
    }
}
