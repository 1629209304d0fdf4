#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use notary_core::NotaryError;
use notary_engine::{RawOutput, ToolRunner};

type Respond = dyn Fn(&[String]) -> Result<RawOutput, NotaryError> + Send + Sync;

/// Stands in for the notarization tool: answers from a closure and records every call.
pub struct ScriptedRunner {
    respond: Box<Respond>,
    delay: Duration,
    calls: Mutex<Vec<Vec<String>>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedRunner {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&[String]) -> Result<RawOutput, NotaryError> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ToolRunner for ScriptedRunner {
    async fn execute(&self, args: &[String]) -> Result<RawOutput, NotaryError> {
        self.calls.lock().unwrap().push(args.to_vec());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        (self.respond)(args)
    }
}

pub fn ok(stdout: impl Into<String>) -> Result<RawOutput, NotaryError> {
    Ok(RawOutput {
        success: true,
        stdout: stdout.into().into_bytes(),
        stderr: Vec::new(),
    })
}

pub fn failed(stdout: impl Into<String>) -> Result<RawOutput, NotaryError> {
    Ok(RawOutput {
        success: false,
        stdout: stdout.into().into_bytes(),
        stderr: b"altool failed".to_vec(),
    })
}

/// Value following `flag` in an argument list.
pub fn arg_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|pos| args.get(pos + 1))
        .map(String::as_str)
}

pub fn plist(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
{body}
</plist>
"#
    )
}

pub fn history_item_xml(uuid: &str) -> String {
    format!(
        "<dict>
<key>Date</key><date>2019-06-01T10:00:00Z</date>
<key>RequestUUID</key><string>{uuid}</string>
<key>Status</key><string>success</string>
<key>Status Code</key><integer>0</integer>
<key>Status Message</key><string>Package Approved</string>
</dict>"
    )
}

pub fn history_xml(uuids: &[&str], next_page: Option<i64>) -> String {
    let items: String = uuids.iter().map(|uuid| history_item_xml(uuid)).collect();
    let next = next_page
        .map(|page| format!("<key>next-page</key><integer>{page}</integer>"))
        .unwrap_or_default();
    plist(&format!(
        "<dict>
<key>notarization-history</key>
<dict>
<key>items</key>
<array>{items}</array>
{next}
</dict>
<key>success-message</key><string>No errors getting notarization history.</string>
</dict>"
    ))
}

pub fn info_xml(url: &str) -> String {
    plist(&format!(
        "<dict>
<key>notarization-info</key>
<dict>
<key>LogFileURL</key><string>{url}</string>
<key>RequestUUID</key><string>ignored</string>
<key>Status</key><string>success</string>
</dict>
</dict>"
    ))
}

pub fn error_xml(code: i64, message: &str, reason: Option<&str>) -> String {
    let user_info = reason
        .map(|reason| {
            format!(
                "<key>userInfo</key><dict><key>NSLocalizedFailureReason</key><string>{reason}</string></dict>"
            )
        })
        .unwrap_or_default();
    plist(&format!(
        "<dict>
<key>product-errors</key>
<array>
<dict>
<key>code</key><integer>{code}</integer>
<key>message</key><string>{message}</string>
{user_info}
</dict>
</array>
</dict>"
    ))
}
