//! User-triggered sequences: validate, make one API call, render the outcome.
//!
//! Every operation renders its own result into `AppContext::view` before
//! returning. The returned `Result` only tells the caller whether it worked.

pub mod auth;
pub mod download;
pub mod search;
pub mod status;
pub mod upload;

#[cfg(test)]
pub(crate) mod fake;

use std::sync::Arc;

use crate::api::client::DocumentApi;
use crate::error::{ClientError, ClientResult};
use crate::store::models::{Session, UploadRecord};
use crate::store::session::SessionStore;
use crate::view::controller::ViewController;

pub struct AppContext {
    pub api: Arc<dyn DocumentApi>,
    pub store: SessionStore,
    pub session: Option<Session>,
    pub recent_uploads: Vec<UploadRecord>,
    pub view: ViewController,
    pub open_browser: bool,
}

impl AppContext {
    /// Rebuild the in-memory state from durable storage.
    pub fn new(api: Arc<dyn DocumentApi>, store: SessionStore) -> Self {
        let session = store.load();
        let recent_uploads = store.load_recent_uploads();
        let view = ViewController::new(session.is_some());
        tracing::debug!(
            authenticated = session.is_some(),
            recent = recent_uploads.len(),
            "context restored"
        );
        Self {
            api,
            store,
            session,
            recent_uploads,
            view,
            open_browser: true,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.user.username.as_str())
    }

    /// The bearer token, or a redirect to the auth surface when there is none.
    pub(crate) fn require_session(&mut self) -> ClientResult<String> {
        match self.session.as_ref().map(|s| s.token.clone()) {
            Some(token) if !token.is_empty() => Ok(token),
            _ => {
                tracing::info!("no session; redirecting to login");
                self.session = None;
                self.view.require_login();
                Err(ClientError::NotLoggedIn)
            }
        }
    }
}
