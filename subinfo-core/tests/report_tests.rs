//! Integration tests for the pure half of the pipeline.

use subinfo_core::{
    dedupe_urls, extract_urls, DeliveryMode, FetchResult, NodeSummary, RegionClassifier,
    ReportAssembler, UsageInfo, PERMANENT_LABEL,
};

#[test]
fn test_header_to_report_block() {
    let usage = UsageInfo::from_header("upload=100;download=200;total=1000;expire=0").unwrap();
    assert_eq!(usage.used(), 300);
    assert_eq!(usage.remaining(), 700);
    assert_eq!(usage.percent_used(), 30.0);

    let results = vec![
        FetchResult::Success {
            url: "https://a.example/sub".to_string(),
            display_name: "Alpha".to_string(),
            usage,
            node: None,
        },
        FetchResult::failure("https://b.example/sub", "HTTP 404"),
    ];

    let report = ReportAssembler::default().assemble(&results);
    assert_eq!(report.mode, DeliveryMode::Inline);
    assert!(report.text.contains(PERMANENT_LABEL));
    assert!(report.text.contains("Failed: HTTP 404"));
}

#[test]
fn test_region_summary_for_node_names() {
    let names = ["Hong Kong 01", "Hong Kong 02", "Tokyo"];
    let summary = NodeSummary::new(3, RegionClassifier::default().summarize(names));
    assert_eq!(summary.classification, "香港:2 | 日本:1");
}

#[test]
fn test_long_report_goes_to_file_without_markup() {
    let usage = UsageInfo {
        upload: 1 << 30,
        download: 3 << 30,
        total: 100 << 30,
        expire: 1_900_000_000,
    };
    let results: Vec<_> = (0..20)
        .map(|i| FetchResult::Success {
            url: format!("https://airport{i}.example/api/v1/client/subscribe?token=abcdef"),
            display_name: format!("Airport <{i}>"),
            usage,
            node: Some(NodeSummary::generic(42)),
        })
        .collect();

    let assembler = ReportAssembler::default();
    let report = assembler.assemble(&results);

    assert_eq!(report.mode, DeliveryMode::File);
    for tag in ["<b>", "</b>", "<code>", "</code>", "&lt;", "&amp;"] {
        assert!(!report.text.contains(tag), "markup {tag} left in file report");
    }
    assert!(report.text.contains("Airport <19>"));
}

#[test]
fn test_urls_from_text_are_deduplicated() {
    let text = "https://x.example/1 https://y.example/2\nhttps://x.example/1";
    let urls = dedupe_urls(extract_urls(text));
    assert_eq!(urls, vec!["https://x.example/1", "https://y.example/2"]);
}
