use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::models::{Session, User};

pub const SEARCH_RESULT_LIMIT: u32 = 50;

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user_id: String,
    pub username: String,
}

impl AuthResponse {
    pub fn into_session(self) -> Session {
        Session {
            token: self.token,
            user: User {
                user_id: self.user_id,
                username: self.username,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub filename: String,
    pub base64_file: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub document_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub category: String,
    pub doc_type: String,
}

impl SearchQuery {
    /// Query-string pairs in the order the backend expects. The free text goes
    /// out under both `q` and `query`; empty filters are omitted.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        let text = self.text.trim();
        if !text.is_empty() {
            params.push(("q", text.to_string()));
            params.push(("query", text.to_string()));
        }
        let category = self.category.trim();
        if !category.is_empty() {
            params.push(("category", category.to_string()));
        }
        let doc_type = self.doc_type.trim();
        if !doc_type.is_empty() {
            params.push(("type", doc_type.to_lowercase()));
        }
        params.push(("limit", SEARCH_RESULT_LIMIT.to_string()));
        params
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<DocumentSearchResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSearchResult {
    pub document_id: Option<String>,
    pub title: Option<String>,
    pub filename: Option<String>,
    pub category: Option<String>,
    pub file_type: Option<String>,
    pub document_type: Option<String>,
    pub summary: Option<String>,
    pub tags: Option<Vec<String>>,
    pub keywords: Option<Vec<String>>,
    pub updated_at: Option<Value>,
    pub upload_timestamp: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusResponse {
    #[serde(default, alias = "statusHistory")]
    pub history: Vec<StatusRecord>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusRecord {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<Value>,
}

impl StatusRecord {
    /// Numeric timestamp used for ordering. Absent or non-numeric values sort as 0.
    pub fn sort_key(&self) -> f64 {
        match &self.timestamp {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    pub download_url: Option<String>,
    pub expires_in: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params_duplicate_text_and_lowercase_type() {
        let query = SearchQuery {
            text: " invoice ".to_string(),
            category: "Finance".to_string(),
            doc_type: "PDF".to_string(),
        };
        assert_eq!(
            query.to_params(),
            vec![
                ("q", "invoice".to_string()),
                ("query", "invoice".to_string()),
                ("category", "Finance".to_string()),
                ("type", "pdf".to_string()),
                ("limit", "50".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_params_only_limit_when_empty() {
        assert_eq!(
            SearchQuery::default().to_params(),
            vec![("limit", "50".to_string())]
        );
    }

    #[test]
    fn test_status_response_accepts_either_key() {
        let a: StatusResponse =
            serde_json::from_str(r#"{"history":[{"status":"uploaded","timestamp":1}]}"#).unwrap();
        let b: StatusResponse =
            serde_json::from_str(r#"{"statusHistory":[{"status":"uploaded","timestamp":1}]}"#)
                .unwrap();
        let c: StatusResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(a.history.len(), 1);
        assert_eq!(b.history, a.history);
        assert!(c.history.is_empty());
    }

    #[test]
    fn test_sort_key_handles_numbers_strings_and_missing() {
        let rec = |ts: Option<Value>| StatusRecord {
            status: "uploaded".to_string(),
            message: None,
            timestamp: ts,
        };
        assert_eq!(rec(Some(Value::from(1_700_000_000))).sort_key(), 1_700_000_000.0);
        assert_eq!(rec(Some(Value::from("1700000001"))).sort_key(), 1_700_000_001.0);
        assert_eq!(rec(Some(Value::from("yesterday"))).sort_key(), 0.0);
        assert_eq!(rec(None).sort_key(), 0.0);
    }

    #[test]
    fn test_upload_request_wire_names() {
        let body = serde_json::to_value(UploadRequest {
            filename: "a.pdf".to_string(),
            base64_file: "AAA=".to_string(),
        })
        .unwrap();
        assert_eq!(body["filename"], "a.pdf");
        assert_eq!(body["base64File"], "AAA=");
    }
}
