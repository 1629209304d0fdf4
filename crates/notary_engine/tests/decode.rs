mod support;

use chrono::{TimeZone, Utc};
use notary_core::NotaryError;
use notary_engine::{decode_history_page, decode_log_url, decode_product_error, DecodeError};
use pretty_assertions::assert_eq;
use support::{error_xml, history_xml, info_xml, plist};

#[test]
fn history_page_decodes_items_and_cursor() {
    let page = decode_history_page(&history_xml(&["A", "B"], Some(1))).unwrap();

    assert_eq!(page.next_page_cursor, Some(1));
    assert_eq!(page.next_page(), Some(1));
    assert_eq!(page.items.len(), 2);
    let first = &page.items[0];
    assert_eq!(first.uuid, "A");
    assert!(first.success);
    assert_eq!(first.status_code, 0);
    assert_eq!(first.status_message, "Package Approved");
    assert_eq!(
        first.submitted_at,
        Utc.with_ymd_and_hms(2019, 6, 1, 10, 0, 0).unwrap()
    );
    assert_eq!(first.detail_url, None);
}

#[test]
fn negative_cursor_ends_pagination() {
    let page = decode_history_page(&history_xml(&["A"], Some(-1))).unwrap();
    assert_eq!(page.next_page_cursor, Some(-1));
    assert_eq!(page.next_page(), None);
}

#[test]
fn status_other_than_success_is_a_failure() {
    let xml = history_xml(&["A"], None).replace(
        "<string>success</string>",
        "<string>invalid</string>",
    );
    let page = decode_history_page(&xml).unwrap();
    assert!(!page.items[0].success);
}

#[test]
fn history_without_items_is_an_empty_page() {
    let xml = plist("<dict><key>notarization-history</key><dict></dict></dict>");
    let page = decode_history_page(&xml).unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.next_page(), None);
}

#[test]
fn item_missing_a_field_is_a_decode_error() {
    let xml = history_xml(&["A"], None).replace("<key>Status Code</key><integer>0</integer>", "");
    let err = decode_history_page(&xml).unwrap_err();
    assert!(matches!(err, DecodeError::Plist(_)));
}

#[test]
fn missing_history_section_is_a_decode_error() {
    let xml = plist("<dict><key>something-else</key><string>x</string></dict>");
    assert!(decode_history_page(&xml).is_err());
    assert!(decode_history_page("not a plist").is_err());
}

#[test]
fn log_url_is_extracted() {
    let url = decode_log_url(&info_xml("https://osxapps-ssl.itunes.apple.com/log.json")).unwrap();
    assert_eq!(url, "https://osxapps-ssl.itunes.apple.com/log.json");
}

#[test]
fn missing_log_url_is_reported() {
    let xml = plist(
        "<dict><key>notarization-info</key><dict><key>Status</key><string>in progress</string></dict></dict>",
    );
    assert_eq!(
        decode_log_url(&xml).unwrap_err(),
        DecodeError::MissingField("LogFileURL")
    );
}

#[test]
fn product_error_with_failure_reason() {
    let err = decode_product_error(&error_xml(
        1048,
        "Unable to find requested file(s)",
        Some("Invalid credentials"),
    ))
    .unwrap();
    assert_eq!(
        err,
        NotaryError::Tool {
            code: 1048,
            message: "Unable to find requested file(s)".to_string(),
            suggestion: Some("Invalid credentials".to_string()),
        }
    );
}

#[test]
fn product_error_without_failure_reason() {
    let err = decode_product_error(&error_xml(409, "Duplicate", None)).unwrap();
    assert_eq!(err, NotaryError::tool(409, "Duplicate"));
}

#[test]
fn empty_or_absent_product_errors_yield_nothing() {
    let empty = plist("<dict><key>product-errors</key><array></array></dict>");
    assert_eq!(decode_product_error(&empty), None);
    assert_eq!(decode_product_error(&history_xml(&["A"], None)), None);
    assert_eq!(decode_product_error("garbage"), None);
}

#[test]
fn decode_error_maps_to_notary_decode() {
    let err: NotaryError = DecodeError::CursorRevisited(3).into();
    assert!(err.is_decode());
}
