use std::time::SystemTime;

use chrono::{DateTime, Utc};
use notary_core::{HistoryItem, NotaryError};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// One decoded `--notarization-history` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<HistoryItem>,
    /// Raw `next-page` value; negative or absent means no further page.
    pub next_page_cursor: Option<i64>,
}

impl Page {
    pub fn next_page(&self) -> Option<u64> {
        self.next_page_cursor
            .and_then(|cursor| u64::try_from(cursor).ok())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed property list: {0}")]
    Plist(String),
    #[error("missing field {0}")]
    MissingField(&'static str),
    #[error("page cursor {0} points to an already visited page")]
    CursorRevisited(u64),
    #[error("history did not end within {0} pages")]
    PageLimit(usize),
}

impl From<DecodeError> for NotaryError {
    fn from(err: DecodeError) -> Self {
        NotaryError::Decode(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct HistoryEnvelope {
    #[serde(rename = "notarization-history")]
    history: HistoryPayload,
}

#[derive(Debug, Deserialize)]
struct HistoryPayload {
    // The tool leaves `items` out entirely when an account has no submissions.
    #[serde(default)]
    items: Vec<RawHistoryItem>,
    #[serde(rename = "next-page")]
    next_page: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawHistoryItem {
    #[serde(rename = "Date")]
    date: plist::Date,
    #[serde(rename = "RequestUUID")]
    uuid: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Status Code")]
    status_code: i64,
    #[serde(rename = "Status Message")]
    status_message: String,
}

impl From<RawHistoryItem> for HistoryItem {
    fn from(raw: RawHistoryItem) -> Self {
        let submitted_at: DateTime<Utc> = SystemTime::from(raw.date).into();
        HistoryItem {
            uuid: raw.uuid,
            submitted_at,
            success: raw.status == "success",
            status_code: raw.status_code,
            status_message: raw.status_message,
            detail_url: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct InfoEnvelope {
    #[serde(rename = "notarization-info")]
    info: InfoPayload,
}

#[derive(Debug, Deserialize)]
struct InfoPayload {
    #[serde(rename = "LogFileURL")]
    log_file_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(rename = "product-errors", default)]
    product_errors: Vec<ProductError>,
}

#[derive(Debug, Deserialize)]
struct ProductError {
    code: Option<i64>,
    message: Option<String>,
    #[serde(rename = "userInfo")]
    user_info: Option<UserInfo>,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    #[serde(rename = "NSLocalizedFailureReason")]
    failure_reason: Option<String>,
}

fn from_xml<T: DeserializeOwned>(xml: &str) -> Result<T, DecodeError> {
    plist::from_bytes(xml.as_bytes()).map_err(|err| DecodeError::Plist(err.to_string()))
}

/// Decode a history page. Every listed item must carry all of its fields.
pub fn decode_history_page(xml: &str) -> Result<Page, DecodeError> {
    let envelope: HistoryEnvelope = from_xml(xml)?;
    Ok(Page {
        items: envelope
            .history
            .items
            .into_iter()
            .map(HistoryItem::from)
            .collect(),
        next_page_cursor: envelope.history.next_page,
    })
}

/// Extract the log URL from a `--notarization-info` response.
pub fn decode_log_url(xml: &str) -> Result<String, DecodeError> {
    let envelope: InfoEnvelope = from_xml(xml)?;
    envelope
        .info
        .log_file_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .ok_or(DecodeError::MissingField("LogFileURL"))
}

/// First entry of a `product-errors` payload, if `stdout` carries one.
pub fn decode_product_error(stdout: &str) -> Option<NotaryError> {
    let envelope: ErrorEnvelope = from_xml(stdout).ok()?;
    let first = envelope.product_errors.into_iter().next()?;
    Some(NotaryError::Tool {
        code: first.code.unwrap_or(0),
        message: first
            .message
            .unwrap_or_else(|| "Unknown error".to_string()),
        suggestion: first.user_info.and_then(|info| info.failure_reason),
    })
}
