mod support;

use std::sync::Arc;
use std::time::Duration;

use notary_core::{Credential, NotaryError};
use notary_engine::{enrich, Altool, PollSettings};
use pretty_assertions::assert_eq;
use support::{arg_after, failed, info_xml, ok, plist, ScriptedRunner};

fn credential() -> Credential {
    Credential::new("dev@example.com", "pw")
}

fn uuids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

#[tokio::test]
async fn failures_do_not_abort_siblings() {
    let runner = Arc::new(ScriptedRunner::new(|args| {
        match arg_after(args, "--notarization-info").unwrap_or_default() {
            "tool-error" => failed(""),
            "no-url" => ok(plist(
                "<dict><key>notarization-info</key><dict><key>Status</key><string>in progress</string></dict></dict>",
            )),
            "garbage" => ok("not xml at all"),
            uuid => ok(info_xml(&format!("https://logs.example.com/{uuid}"))),
        }
    }));
    let tool = Altool::new(runner.clone());

    let result = enrich(
        &tool,
        &credential(),
        uuids(&["A", "tool-error", "B", "no-url", "garbage", "C"]),
        &PollSettings::default(),
    )
    .await;

    let mut found: Vec<_> = result
        .details
        .iter()
        .map(|d| (d.uuid.as_str(), d.detail_url.as_str()))
        .collect();
    found.sort();
    assert_eq!(
        found,
        vec![
            ("A", "https://logs.example.com/A"),
            ("B", "https://logs.example.com/B"),
            ("C", "https://logs.example.com/C"),
        ]
    );

    let mut failed_ids: Vec<_> = result.failures.iter().map(|f| f.uuid.as_str()).collect();
    failed_ids.sort();
    assert_eq!(failed_ids, vec!["garbage", "no-url", "tool-error"]);
    let tool_failure = result
        .failures
        .iter()
        .find(|f| f.uuid == "tool-error")
        .unwrap();
    assert_eq!(tool_failure.error, NotaryError::NoData);
    assert_eq!(runner.calls().len(), 6);
}

#[tokio::test]
async fn lookups_run_concurrently_within_bound() {
    let runner = Arc::new(
        ScriptedRunner::new(|_| ok(info_xml("https://logs.example.com/x")))
            .with_delay(Duration::from_millis(50)),
    );
    let tool = Altool::new(runner.clone());
    let settings = PollSettings {
        max_concurrent_info: 3,
        ..PollSettings::default()
    };

    let ids: Vec<String> = (0..9).map(|i| format!("item-{i}")).collect();
    let result = enrich(&tool, &credential(), ids, &settings).await;

    assert_eq!(result.details.len(), 9);
    assert!(result.failures.is_empty());
    assert!(runner.max_in_flight() > 1);
    assert!(runner.max_in_flight() <= 3);
}

#[tokio::test]
async fn nothing_to_enrich_makes_no_calls() {
    let runner = Arc::new(ScriptedRunner::new(|_| ok(info_xml("unused"))));
    let tool = Altool::new(runner.clone());

    let result = enrich(&tool, &credential(), Vec::new(), &PollSettings::default()).await;
    assert!(result.details.is_empty());
    assert!(runner.calls().is_empty());
}
