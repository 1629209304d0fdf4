#![cfg(unix)]

mod support;

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use notary_core::{Credential, NotaryError};
use notary_engine::{Altool, ToolSettings};
use support::{error_xml, history_xml};

/// Writes an executable shell script standing in for the notarization tool.
fn write_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake-altool");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

fn tool_for(executable: PathBuf) -> Altool {
    Altool::with_settings(ToolSettings {
        executable: Some(executable),
        ..ToolSettings::default()
    })
}

#[tokio::test]
async fn subprocess_stdout_is_returned() {
    let temp = tempfile::TempDir::new().unwrap();
    let payload = temp.path().join("history.xml");
    fs::write(&payload, history_xml(&["A"], None)).unwrap();
    let script = write_script(
        temp.path(),
        &format!(
            "if [ \"$1\" = \"--notarization-history\" ]; then cat '{}'; exit 0; fi\nexit 1",
            payload.display()
        ),
    );

    let xml = tool_for(script)
        .history_page(&Credential::new("dev", "pw"), 0)
        .await
        .unwrap();
    assert!(xml.contains("<string>A</string>"));
}

#[tokio::test]
async fn subprocess_product_errors_are_decoded() {
    let temp = tempfile::TempDir::new().unwrap();
    let payload = temp.path().join("error.xml");
    fs::write(&payload, error_xml(409, "Duplicate", None)).unwrap();
    let script = write_script(temp.path(), &format!("cat '{}'\nexit 1", payload.display()));

    let err = tool_for(script)
        .history_page(&Credential::new("dev", "pw"), 0)
        .await
        .unwrap_err();
    assert_eq!(err, NotaryError::tool(409, "Duplicate"));
}

#[tokio::test]
async fn help_output_on_stderr_counts_as_available() {
    let temp = tempfile::TempDir::new().unwrap();
    let script = write_script(temp.path(), "echo 'Usage: altool' >&2\nexit 1");

    assert!(tool_for(script).is_available().await);
}
