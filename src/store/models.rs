use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub username: String,
}

/// An authenticated session. Token and user only exist as a pair; "logged out"
/// is the absence of a `Session`, never a half-filled one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRecord {
    pub document_id: String,
    pub filename: String,
    pub upload_time: String,
}

impl UploadRecord {
    /// First eight characters of the document id, as shown in lists.
    pub fn short_id(&self) -> String {
        self.document_id.chars().take(8).collect()
    }
}
