//! CLI output formatting tests.

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::JsonFormatter;
    use subinfo_core::{FetchResult, NodeSummary, UsageInfo};

    const GIB: u64 = 1 << 30;

    fn success(expire: i64, node: Option<NodeSummary>) -> FetchResult {
        FetchResult::Success {
            url: "https://a.example/sub".to_string(),
            display_name: "Cloud".to_string(),
            usage: UsageInfo {
                upload: GIB,
                download: 4 * GIB,
                total: 10 * GIB,
                expire,
            },
            node,
        }
    }

    #[test]
    fn test_format_pretty_json() {
        let formatter = JsonFormatter::new(true);
        let output = formatter.format(&serde_json::json!({"key": "value"})).unwrap();
        assert!(output.contains('\n'));
        assert!(output.contains("  "));
    }

    #[test]
    fn test_format_compact_json() {
        let formatter = JsonFormatter::new(false);
        let output = formatter.format(&serde_json::json!({"key": "value"})).unwrap();
        assert_eq!(output, r#"{"key":"value"}"#);
    }

    #[test]
    fn test_format_results_mixed_batch() {
        let results = vec![
            success(1_767_225_600, Some(NodeSummary::new(3, "香港:2 | 日本:1"))),
            FetchResult::failure("https://b.example/sub", "HTTP 404"),
        ];
        let output = JsonFormatter::new(false).format_results(&results).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["queried"], 2);
        assert_eq!(value["succeeded"], 1);
        assert_eq!(value["failed"], 1);

        let ok = &value["results"][0];
        assert_eq!(ok["status"], "ok");
        assert_eq!(ok["name"], "Cloud");
        assert_eq!(ok["usage"]["used"], 5 * GIB);
        assert_eq!(ok["usage"]["remaining"], 5 * GIB);
        assert_eq!(ok["usage"]["percentUsed"], 50.0);
        assert_eq!(ok["usage"]["permanent"], false);
        assert_eq!(ok["usage"]["expiresAt"], "2026-01-01T00:00:00+00:00");
        assert_eq!(ok["nodes"]["count"], 3);
        assert_eq!(ok["nodes"]["classification"], "香港:2 | 日本:1");
        assert!(ok.get("error").is_none());

        let failed = &value["results"][1];
        assert_eq!(failed["url"], "https://b.example/sub");
        assert_eq!(failed["status"], "error");
        assert_eq!(failed["error"], "HTTP 404");
        assert!(failed.get("usage").is_none());
        assert!(failed.get("name").is_none());
    }

    #[test]
    fn test_permanent_subscription_has_no_expiry() {
        let output = JsonFormatter::new(false)
            .format_results(&[success(0, None)])
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        let usage = &value["results"][0]["usage"];
        assert_eq!(usage["permanent"], true);
        assert!(usage.get("expiresAt").is_none());
        assert!(value["results"][0].get("nodes").is_none());
    }

    #[test]
    fn test_empty_batch() {
        let output = JsonFormatter::new(false).format_results(&[]).unwrap();
        assert_eq!(output, r#"{"queried":0,"succeeded":0,"failed":0,"results":[]}"#);
    }
}
