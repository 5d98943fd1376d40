use crate::error::{ClientError, ClientResult};
use crate::ops::AppContext;

pub const MISSING_URL: &str = "Download URL not received";

/// Fetch a download link for `document_id` and open it. Returns the URL.
pub async fn download(ctx: &mut AppContext, document_id: &str) -> ClientResult<String> {
    let token = ctx.require_session()?;

    let document_id = document_id.trim();
    if document_id.is_empty() {
        ctx.view.alert("Please enter document ID");
        return Err(ClientError::Validation(
            "Please enter document ID".to_string(),
        ));
    }

    let result = match ctx.api.download(&token, document_id).await {
        Ok(response) => {
            let expires_in = response.expires_in;
            response
                .download_url
                .filter(|u| !u.trim().is_empty())
                .map(|url| (url, expires_in))
                .ok_or_else(|| ClientError::Parse(MISSING_URL.to_string()))
        }
        Err(e) => Err(e),
    };

    match result {
        Ok((url, expires_in)) => {
            tracing::info!(%document_id, ?expires_in, "download link received");
            if ctx.open_browser {
                if let Err(e) = open_in_browser(&url) {
                    tracing::warn!(error = %e, "could not launch browser");
                }
            }
            ctx.view.opened_url = Some(url.clone());
            Ok(url)
        }
        Err(e) => {
            let message = match &e {
                ClientError::Parse(m) if m == MISSING_URL => m.clone(),
                other => other.user_message("Download failed"),
            };
            tracing::warn!(%document_id, error = %e, "download failed");
            ctx.view.alert(format!("Download failed: {}", message));
            Err(e)
        }
    }
}

fn open_in_browser(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    let mut cmd = std::process::Command::new("open");
    #[cfg(target_os = "windows")]
    let mut cmd = {
        let mut c = std::process::Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    };
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut cmd = std::process::Command::new("xdg-open");

    cmd.arg(url)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::DownloadResponse;
    use crate::ops::fake::{alice, context, FakeApi};
    use crate::view::controller::Screen;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_download_without_session_is_redirected() {
        let api = Arc::new(FakeApi::default());
        let mut ctx = context(api.clone(), None);

        assert!(matches!(
            download(&mut ctx, "doc-1").await,
            Err(ClientError::NotLoggedIn)
        ));
        assert_eq!(api.call_count(), 0);
        assert_eq!(ctx.view.screen(), Screen::Unauthenticated);
    }

    #[tokio::test]
    async fn test_download_records_url() {
        let api = Arc::new(FakeApi::default());
        *api.download_response.lock().unwrap() = Ok(DownloadResponse {
            download_url: Some("https://files.example.com/x".to_string()),
            ..Default::default()
        });
        let mut ctx = context(api.clone(), Some(alice()));

        let url = download(&mut ctx, "doc-1").await.unwrap();

        assert_eq!(url, "https://files.example.com/x");
        assert_eq!(ctx.view.opened_url.as_deref(), Some("https://files.example.com/x"));
        assert_eq!(ctx.view.current_alert(), None);
    }

    #[tokio::test]
    async fn test_missing_url_alerts() {
        let api = Arc::new(FakeApi::default());
        let mut ctx = context(api.clone(), Some(alice()));

        download(&mut ctx, "doc-1").await.unwrap_err();

        assert_eq!(
            ctx.view.current_alert(),
            Some("Download failed: Download URL not received")
        );
        assert_eq!(ctx.view.opened_url, None);
    }

    #[tokio::test]
    async fn test_server_message_is_alerted() {
        let api = Arc::new(FakeApi::default());
        *api.download_response.lock().unwrap() = Err(ClientError::Http {
            status: 403,
            body: r#"{"message":"Access denied to this document"}"#.to_string(),
        });
        let mut ctx = context(api.clone(), Some(alice()));

        download(&mut ctx, "doc-1").await.unwrap_err();

        assert_eq!(
            ctx.view.current_alert(),
            Some("Download failed: Access denied to this document")
        );
    }
}
