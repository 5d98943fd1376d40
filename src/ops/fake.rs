use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::api::client::DocumentApi;
use crate::api::models::{
    AuthResponse, Credentials, DownloadResponse, Registration, SearchQuery, SearchResponse,
    StatusResponse, UploadRequest, UploadResponse,
};
use crate::error::{ClientError, ClientResult};
use crate::ops::AppContext;
use crate::store::models::{Session, User};
use crate::store::session::SessionStore;

/// Canned backend that counts every call and remembers what it was sent.
pub struct FakeApi {
    pub calls: AtomicUsize,
    pub password: String,
    pub uploads: Mutex<Vec<UploadRequest>>,
    pub searches: Mutex<Vec<SearchQuery>>,
    pub search_response: Mutex<ClientResult<SearchResponse>>,
    pub status_response: Mutex<ClientResult<StatusResponse>>,
    pub download_response: Mutex<ClientResult<DownloadResponse>>,
    pub upload_error: Mutex<Option<ClientError>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            password: "secret1".to_string(),
            uploads: Mutex::new(Vec::new()),
            searches: Mutex::new(Vec::new()),
            search_response: Mutex::new(Ok(SearchResponse::default())),
            status_response: Mutex::new(Ok(StatusResponse::default())),
            download_response: Mutex::new(Ok(DownloadResponse::default())),
            upload_error: Mutex::new(None),
        }
    }
}

impl FakeApi {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn auth(&self, username: &str, password: &str) -> ClientResult<AuthResponse> {
        if password != self.password {
            return Err(ClientError::Http {
                status: 401,
                body: r#"{"message":"Invalid username or password"}"#.to_string(),
            });
        }
        Ok(AuthResponse {
            token: format!("tok-{}", username),
            user_id: format!("id-{}", username),
            username: username.to_string(),
        })
    }
}

fn take<T: Default>(slot: &Mutex<ClientResult<T>>) -> ClientResult<T> {
    std::mem::replace(&mut *slot.lock().unwrap(), Ok(T::default()))
}

#[async_trait]
impl DocumentApi for FakeApi {
    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthResponse> {
        self.hit();
        self.auth(&credentials.username, &credentials.password)
    }

    async fn register(&self, registration: &Registration) -> ClientResult<AuthResponse> {
        self.hit();
        self.auth(&registration.username, &registration.password)
    }

    async fn upload(&self, _token: &str, request: &UploadRequest) -> ClientResult<UploadResponse> {
        self.hit();
        self.uploads.lock().unwrap().push(request.clone());
        if let Some(err) = self.upload_error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(UploadResponse {
            document_id: format!("doc-{}", self.uploads.lock().unwrap().len()),
        })
    }

    async fn search(&self, _token: &str, query: &SearchQuery) -> ClientResult<SearchResponse> {
        self.hit();
        self.searches.lock().unwrap().push(query.clone());
        take(&self.search_response)
    }

    async fn status(&self, _token: &str, _document_id: &str) -> ClientResult<StatusResponse> {
        self.hit();
        take(&self.status_response)
    }

    async fn download(&self, _token: &str, _document_id: &str) -> ClientResult<DownloadResponse> {
        self.hit();
        take(&self.download_response)
    }
}

pub fn alice() -> Session {
    Session {
        token: "tok-alice".to_string(),
        user: User {
            user_id: "id-alice".to_string(),
            username: "alice".to_string(),
        },
    }
}

/// Context over an in-memory store, optionally already logged in.
pub fn context(api: Arc<FakeApi>, session: Option<Session>) -> AppContext {
    let mut store = SessionStore::in_memory().unwrap();
    if let Some(session) = &session {
        store.save(session).unwrap();
    }
    let mut ctx = AppContext::new(api, store);
    ctx.open_browser = false;
    ctx
}
