use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::error::ClientResult;
use crate::store::models::{Session, UploadRecord, User};
use crate::store::schema;

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const CURRENT_USER_KEY: &str = "currentUser";
pub const RECENT_UPLOADS_KEY: &str = "recentUploads";

pub const RECENT_UPLOADS_CAP: usize = 5;

/// Durable home of the session and the recent-uploads list.
///
/// Reads never fail the caller: a missing or corrupt value is logged and
/// treated as absent. Writes report storage errors.
pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    pub fn open(path: &Path) -> ClientResult<Self> {
        Ok(Self {
            conn: schema::open_db(path)?,
        })
    }

    #[cfg(test)]
    pub fn in_memory() -> ClientResult<Self> {
        Ok(Self {
            conn: schema::open_in_memory()?,
        })
    }

    /// The last saved session, or `None` when nothing usable is stored.
    pub fn load(&self) -> Option<Session> {
        let token = self.get(AUTH_TOKEN_KEY).filter(|t| !t.is_empty())?;
        let raw_user = self.get(CURRENT_USER_KEY)?;
        match serde_json::from_str::<User>(&raw_user) {
            Ok(user) => Some(Session { token, user }),
            Err(e) => {
                tracing::warn!(error = %e, "stored currentUser is not valid JSON; ignoring session");
                None
            }
        }
    }

    /// Persist token and user in one transaction.
    pub fn save(&mut self, session: &Session) -> ClientResult<()> {
        let user_json = serde_json::to_string(&session.user)
            .map_err(|e| crate::error::ClientError::Parse(e.to_string()))?;
        let tx = self.conn.transaction()?;
        put(&tx, AUTH_TOKEN_KEY, &session.token)?;
        put(&tx, CURRENT_USER_KEY, &user_json)?;
        tx.commit()?;
        tracing::debug!(username = %session.user.username, "session saved");
        Ok(())
    }

    pub fn clear(&mut self) -> ClientResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM kv WHERE key IN (?1, ?2)",
            params![AUTH_TOKEN_KEY, CURRENT_USER_KEY],
        )?;
        tx.commit()?;
        tracing::debug!("session cleared");
        Ok(())
    }

    /// Most-recent-first upload history; empty when absent or corrupt.
    pub fn load_recent_uploads(&self) -> Vec<UploadRecord> {
        let Some(raw) = self.get(RECENT_UPLOADS_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<UploadRecord>>(&raw) {
            Ok(mut uploads) => {
                uploads.truncate(RECENT_UPLOADS_CAP);
                uploads
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored recentUploads is not valid JSON; starting empty");
                Vec::new()
            }
        }
    }

    /// Prepend `record`, keep the newest five, persist, and return the new list.
    pub fn push_recent_upload(&mut self, record: UploadRecord) -> ClientResult<Vec<UploadRecord>> {
        let mut uploads = self.load_recent_uploads();
        uploads.insert(0, record);
        uploads.truncate(RECENT_UPLOADS_CAP);
        let json = serde_json::to_string(&uploads)
            .map_err(|e| crate::error::ClientError::Parse(e.to_string()))?;
        put(&self.conn, RECENT_UPLOADS_KEY, &json)?;
        Ok(uploads)
    }

    fn get(&self, key: &str) -> Option<String> {
        let result = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional();
        match result {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read stored value");
                None
            }
        }
    }

    #[cfg(test)]
    fn put_raw(&self, key: &str, value: &str) {
        put(&self.conn, key, value).unwrap();
    }
}

fn put(conn: &Connection, key: &str, value: &str) -> ClientResult<()> {
    conn.execute(
        "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, Utc::now().timestamp_millis()],
    )?;
    Ok(())
}
