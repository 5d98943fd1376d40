use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::api::models::{DocumentSearchResult, StatusRecord};

const DISPLAY_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";
pub const UNKNOWN_DATE: &str = "Unknown Date";

pub fn status_label(code: &str) -> &str {
    match code {
        "pending_upload" => "Pending Upload",
        "uploaded" => "Uploaded",
        "extraction_processing" => "AI Analyzing",
        "extraction_completed" => "AI Analysis Completed",
        "classification_processing" => "Classifying",
        "classification_completed" => "Classified",
        "completed" => "Completed",
        "failed" => "Failed",
        other => other,
    }
}

pub fn format_local(dt: DateTime<Local>) -> String {
    dt.format(DISPLAY_FORMAT).to_string()
}

pub fn now_display() -> String {
    format_local(Local::now())
}

/// Render a server timestamp. Numbers (and all-digit strings) are epoch
/// seconds; other strings are parsed as ISO dates.
pub fn format_date(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => n
            .as_f64()
            .map(format_epoch_seconds)
            .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                UNKNOWN_DATE.to_string()
            } else if s.chars().all(|c| c.is_ascii_digit()) {
                s.parse::<f64>()
                    .map(format_epoch_seconds)
                    .unwrap_or_else(|_| UNKNOWN_DATE.to_string())
            } else {
                parse_date_string(s)
                    .map(format_local)
                    .unwrap_or_else(|| UNKNOWN_DATE.to_string())
            }
        }
        _ => UNKNOWN_DATE.to_string(),
    }
}

fn format_epoch_seconds(secs: f64) -> String {
    DateTime::from_timestamp_millis((secs * 1000.0) as i64)
        .map(|dt| format_local(dt.with_timezone(&Local)))
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

fn parse_date_string(s: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(&Local))
}

/// A search hit with every fallback already resolved for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCard {
    pub document_id: String,
    pub title: String,
    pub category: String,
    pub file_type: String,
    pub document_type: String,
    pub date: String,
    pub summary: String,
    pub tags: Vec<String>,
}

impl From<&DocumentSearchResult> for ResultCard {
    fn from(doc: &DocumentSearchResult) -> Self {
        Self {
            document_id: doc.document_id.clone().unwrap_or_default(),
            title: doc
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .or_else(|| doc.filename.clone())
                .unwrap_or_default(),
            category: doc
                .category
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "Uncategorized".to_string()),
            file_type: file_type_label(doc),
            document_type: doc
                .document_type
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Unknown document".to_string()),
            date: format_date(
                doc.updated_at
                    .as_ref()
                    .filter(|v| is_present(v))
                    .or(doc.upload_timestamp.as_ref()),
            ),
            summary: doc
                .summary
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "Processing summary...".to_string()),
            tags: doc
                .tags
                .clone()
                .or_else(|| doc.keywords.clone())
                .unwrap_or_default(),
        }
    }
}

fn is_present(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        _ => true,
    }
}

pub fn file_type_label(doc: &DocumentSearchResult) -> String {
    if let Some(ft) = doc.file_type.as_deref().filter(|f| !f.is_empty()) {
        return ft.to_uppercase();
    }
    match doc.filename.as_deref().and_then(|f| f.rsplit_once('.')) {
        Some((_, ext)) => ext.to_uppercase(),
        None => "UNKNOWN".to_string(),
    }
}

/// One line of a status timeline, ready to print.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEntry {
    pub label: String,
    pub message: String,
    pub when: String,
}

impl From<&StatusRecord> for StatusEntry {
    fn from(record: &StatusRecord) -> Self {
        Self {
            label: status_label(&record.status).to_string(),
            message: record.message.clone().unwrap_or_default(),
            when: format_date(record.timestamp.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_status_labels() {
        assert_eq!(status_label("extraction_processing"), "AI Analyzing");
        assert_eq!(status_label("classification_completed"), "Classified");
        assert_eq!(status_label("pending_upload"), "Pending Upload");
    }

    #[test]
    fn test_unknown_status_is_verbatim() {
        assert_eq!(status_label("foo_bar"), "foo_bar");
    }

    #[test]
    fn test_format_date_unknown_inputs() {
        assert_eq!(format_date(None), UNKNOWN_DATE);
        assert_eq!(format_date(Some(&Value::Null)), UNKNOWN_DATE);
        assert_eq!(format_date(Some(&json!(""))), UNKNOWN_DATE);
        assert_eq!(format_date(Some(&json!("not a date"))), UNKNOWN_DATE);
        assert_eq!(format_date(Some(&json!(["x"]))), UNKNOWN_DATE);
    }

    #[test]
    fn test_format_date_numeric_and_digit_string_agree() {
        let from_number = format_date(Some(&json!(1_700_000_000)));
        let from_string = format_date(Some(&json!("1700000000")));
        assert_ne!(from_number, UNKNOWN_DATE);
        assert_eq!(from_number, from_string);
        assert!(from_number.contains("2023"));
    }

    #[test]
    fn test_format_date_iso_string() {
        let rendered = format_date(Some(&json!("2024-03-15T12:00:00Z")));
        assert!(rendered.contains("/2024, "), "{rendered}");
        assert_ne!(format_date(Some(&json!("2024-03-15T12:00:00.123456"))), UNKNOWN_DATE);
    }

    #[test]
    fn test_result_card_fallbacks() {
        let doc = DocumentSearchResult {
            filename: Some("report.final.docx".to_string()),
            keywords: Some(vec!["q3".to_string()]),
            ..Default::default()
        };
        let card = ResultCard::from(&doc);
        assert_eq!(card.document_id, "");
        assert_eq!(card.title, "report.final.docx");
        assert_eq!(card.category, "Uncategorized");
        assert_eq!(card.file_type, "DOCX");
        assert_eq!(card.document_type, "Unknown document");
        assert_eq!(card.date, UNKNOWN_DATE);
        assert_eq!(card.summary, "Processing summary...");
        assert_eq!(card.tags, vec!["q3".to_string()]);
    }

    #[test]
    fn test_result_card_prefers_explicit_fields() {
        let doc = DocumentSearchResult {
            document_id: Some("doc-9".to_string()),
            title: Some("Q3 Invoice".to_string()),
            filename: Some("inv.pdf".to_string()),
            category: Some("Finance".to_string()),
            file_type: Some("pdf".to_string()),
            tags: Some(vec!["invoice".to_string()]),
            keywords: Some(vec!["ignored".to_string()]),
            updated_at: Some(json!(1_700_000_000)),
            upload_timestamp: Some(json!("garbage")),
            ..Default::default()
        };
        let card = ResultCard::from(&doc);
        assert_eq!(card.document_id, "doc-9");
        assert_eq!(card.title, "Q3 Invoice");
        assert_eq!(card.file_type, "PDF");
        assert_eq!(card.tags, vec!["invoice".to_string()]);
        assert_ne!(card.date, UNKNOWN_DATE);
    }

    #[test]
    fn test_file_type_without_extension() {
        let doc = DocumentSearchResult {
            filename: Some("README".to_string()),
            ..Default::default()
        };
        assert_eq!(file_type_label(&doc), "UNKNOWN");
    }
}
