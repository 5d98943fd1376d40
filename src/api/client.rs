use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::api::models::{
    AuthResponse, Credentials, DownloadResponse, Registration, SearchQuery, SearchResponse,
    StatusResponse, UploadRequest, UploadResponse,
};
use crate::error::{ClientError, ClientResult};

/// The backend contract the orchestration layer talks to.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthResponse>;

    async fn register(&self, registration: &Registration) -> ClientResult<AuthResponse>;

    async fn upload(&self, token: &str, request: &UploadRequest) -> ClientResult<UploadResponse>;

    async fn search(&self, token: &str, query: &SearchQuery) -> ClientResult<SearchResponse>;

    async fn status(&self, token: &str, document_id: &str) -> ClientResult<StatusResponse>;

    async fn download(&self, token: &str, document_id: &str) -> ClientResult<DownloadResponse>;
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.filter(|u| !u.trim().is_empty()),
        }
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        let base = self.base_url.as_deref().ok_or_else(|| {
            ClientError::Configuration(
                "API base URL missing (set api.base_url in config.toml or DOCDESK_API_URL)"
                    .to_string(),
            )
        })?;
        Url::parse(&format!("{}{}", base.trim_end_matches('/'), path)).map_err(|e| {
            ClientError::Configuration(format!("invalid API base URL '{}': {}", base, e))
        })
    }

    fn request(&self, method: Method, url: Url, token: Option<&str>) -> RequestBuilder {
        tracing::debug!(%method, %url, authenticated = token.is_some(), "api request");
        let builder = self.http.request(method, url);
        match token.filter(|t| !t.is_empty()) {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, "api request did not complete");
            ClientError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "api request failed");
            return Err(ClientError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Parse(e.to_string()))
    }
}

#[async_trait]
impl DocumentApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthResponse> {
        let url = self.url("/auth/login")?;
        self.execute(self.request(Method::POST, url, None).json(credentials))
            .await
    }

    async fn register(&self, registration: &Registration) -> ClientResult<AuthResponse> {
        let url = self.url("/auth/register")?;
        self.execute(self.request(Method::POST, url, None).json(registration))
            .await
    }

    async fn upload(&self, token: &str, request: &UploadRequest) -> ClientResult<UploadResponse> {
        let url = self.url("/documents")?;
        self.execute(self.request(Method::POST, url, Some(token)).json(request))
            .await
    }

    async fn search(&self, token: &str, query: &SearchQuery) -> ClientResult<SearchResponse> {
        let url = self.url("/search")?;
        self.execute(
            self.request(Method::GET, url, Some(token))
                .query(&query.to_params()),
        )
        .await
    }

    async fn status(&self, token: &str, document_id: &str) -> ClientResult<StatusResponse> {
        let mut url = self.url("/status")?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Configuration("API base URL cannot carry a path".to_string()))?
            .push(document_id);
        self.execute(self.request(Method::GET, url, Some(token)))
            .await
    }

    async fn download(&self, token: &str, document_id: &str) -> ClientResult<DownloadResponse> {
        let url = self.url("/download")?;
        self.execute(
            self.request(Method::GET, url, Some(token))
                .query(&[("documentId", document_id)]),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, RawQuery, State};
    use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Seen {
        query: Arc<Mutex<Option<String>>>,
        auth: Arc<Mutex<Option<String>>>,
        body: Arc<Mutex<Option<Value>>>,
    }

    impl Seen {
        fn record(&self, headers: &HeaderMap) {
            *self.auth.lock().unwrap() = headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
        }
    }

    async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if body["username"] == "alice" && body["password"] == "secret1" {
            (
                StatusCode::OK,
                Json(json!({"message": "Login successful", "token": "tok-1", "userId": "u-1", "username": "alice"})),
            )
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"message": "Invalid username or password"})),
            )
        }
    }

    async fn upload(
        State(seen): State<Seen>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        seen.record(&headers);
        *seen.body.lock().unwrap() = Some(body);
        Json(json!({"documentId": "doc-42"}))
    }

    async fn search(
        State(seen): State<Seen>,
        headers: HeaderMap,
        RawQuery(query): RawQuery,
    ) -> Json<Value> {
        seen.record(&headers);
        *seen.query.lock().unwrap() = query;
        Json(json!({"results": [{"documentId": "doc-1", "title": "Invoice"}], "count": 1}))
    }

    async fn status(Path(id): Path<String>) -> Json<Value> {
        Json(json!({"statusHistory": [
            {"documentId": id, "status": "uploaded", "timestamp": 10},
            {"documentId": id, "status": "completed", "timestamp": "20"}
        ]}))
    }

    async fn download(State(seen): State<Seen>, RawQuery(query): RawQuery) -> Json<Value> {
        *seen.query.lock().unwrap() = query;
        Json(json!({"downloadUrl": "https://files.example.com/doc-1?sig=abc", "expiresIn": 900}))
    }

    async fn spawn_backend(seen: Seen) -> String {
        let app = Router::new()
            .route("/auth/login", post(login))
            .route("/documents", post(upload))
            .route("/search", get(search))
            .route("/status/{id}", get(status))
            .route("/download", get(download))
            .with_state(seen);
        spawn(app).await
    }

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve app");
        });
        format!("http://{}", addr)
    }

    fn creds(password: &str) -> Credentials {
        Credentials {
            username: "alice".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_base_url_fails_before_io() {
        let client = ApiClient::new(None);
        let err = client.login(&creds("secret1")).await.unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));

        let blank = ApiClient::new(Some("  ".to_string()));
        assert!(blank.base_url().is_none());
    }

    #[tokio::test]
    async fn test_login_success_and_failure() {
        let base = spawn_backend(Seen::default()).await;
        let client = ApiClient::new(Some(base));

        let ok = client.login(&creds("secret1")).await.unwrap();
        assert_eq!(ok.token, "tok-1");
        assert_eq!(ok.into_session().user.username, "alice");

        let err = client.login(&creds("wrong")).await.unwrap_err();
        match &err {
            ClientError::Http { status, body } => {
                assert_eq!(*status, 401);
                assert!(body.contains("Invalid username"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            err.server_message().as_deref(),
            Some("Invalid username or password")
        );
    }

    #[tokio::test]
    async fn test_upload_sends_bearer_and_camel_case_body() {
        let seen = Seen::default();
        let base = spawn_backend(seen.clone()).await;
        let client = ApiClient::new(Some(format!("{}/", base)));

        let res = client
            .upload(
                "tok-1",
                &UploadRequest {
                    filename: "a.txt".to_string(),
                    base64_file: "aGk=".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(res.document_id, "doc-42");
        assert_eq!(seen.auth.lock().unwrap().as_deref(), Some("Bearer tok-1"));
        let body = seen.body.lock().unwrap().clone().unwrap();
        assert_eq!(body, json!({"filename": "a.txt", "base64File": "aGk="}));
    }

    #[tokio::test]
    async fn test_search_query_string() {
        let seen = Seen::default();
        let base = spawn_backend(seen.clone()).await;
        let client = ApiClient::new(Some(base));

        let res = client
            .search(
                "tok-1",
                &SearchQuery {
                    text: "invoice 2024".to_string(),
                    category: "Finance".to_string(),
                    doc_type: "PDF".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(res.results.len(), 1);
        assert_eq!(
            seen.query.lock().unwrap().as_deref(),
            Some("q=invoice+2024&query=invoice+2024&category=Finance&type=pdf&limit=50")
        );
        assert_eq!(seen.auth.lock().unwrap().as_deref(), Some("Bearer tok-1"));
    }

    #[tokio::test]
    async fn test_status_reads_alias_key() {
        let base = spawn_backend(Seen::default()).await;
        let client = ApiClient::new(Some(base));
        let res = client.status("tok-1", "doc-1").await.unwrap();
        assert_eq!(res.history.len(), 2);
        assert_eq!(res.history[1].sort_key(), 20.0);
    }

    #[tokio::test]
    async fn test_download_passes_document_id() {
        let seen = Seen::default();
        let base = spawn_backend(seen.clone()).await;
        let client = ApiClient::new(Some(base));
        let res = client.download("tok-1", "doc-1").await.unwrap();
        assert_eq!(
            res.download_url.as_deref(),
            Some("https://files.example.com/doc-1?sig=abc")
        );
        assert_eq!(res.expires_in, Some(900));
        assert_eq!(seen.query.lock().unwrap().as_deref(), Some("documentId=doc-1"));
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_parse_error() {
        let app = Router::new().route("/documents", post(|| async { "not json" }));
        let client = ApiClient::new(Some(spawn(app).await));
        let err = client
            .upload(
                "tok-1",
                &UploadRequest {
                    filename: "a.txt".to_string(),
                    base64_file: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));
    }

    #[tokio::test]
    async fn test_missing_expected_field_is_parse_error() {
        let app = Router::new().route("/documents", post(|| async { Json(json!({"ok": true})) }));
        let client = ApiClient::new(Some(spawn(app).await));
        let err = client
            .upload(
                "tok-1",
                &UploadRequest {
                    filename: "a.txt".to_string(),
                    base64_file: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(Some(format!("http://{}", addr)));
        let err = client.login(&creds("secret1")).await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }
}
