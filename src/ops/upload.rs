use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

use crate::api::models::UploadRequest;
use crate::error::{ClientError, ClientResult};
use crate::ops::AppContext;
use crate::store::models::UploadRecord;
use crate::view::controller::{UploadResult, UploadStage};
use crate::view::format::now_display;

/// Read a file and return its contents as standard base64.
pub async fn encode_file(path: &Path) -> ClientResult<String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ClientError::FileRead(format!("{}: {}", path.display(), e)))?;
    Ok(STANDARD.encode(bytes))
}

/// Upload `path`, returning the new document id.
pub async fn upload_file(ctx: &mut AppContext, path: &Path) -> ClientResult<String> {
    let token = ctx.require_session()?;

    let Some(filename) = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty())
    else {
        let err = ClientError::Validation("Please choose a file to upload".to_string());
        ctx.view.set_progress(None);
        ctx.view.upload_result = Some(UploadResult::Failed(err.to_string()));
        return Err(err);
    };

    ctx.view.upload_result = None;
    let result = send(ctx, &token, path, &filename).await;
    ctx.view.set_progress(None);

    match result {
        Ok(document_id) => {
            tracing::info!(%document_id, %filename, "upload complete");
            ctx.view.status_input = document_id.clone();
            ctx.view.upload_result = Some(UploadResult::Success {
                document_id: document_id.clone(),
                filename: filename.clone(),
            });
            remember(ctx, UploadRecord {
                document_id: document_id.clone(),
                filename,
                upload_time: now_display(),
            });
            Ok(document_id)
        }
        Err(e) => {
            tracing::warn!(%filename, error = %e, "upload failed");
            ctx.view.upload_result = Some(UploadResult::Failed(failure_message(&e)));
            Err(e)
        }
    }
}

async fn send(
    ctx: &mut AppContext,
    token: &str,
    path: &Path,
    filename: &str,
) -> ClientResult<String> {
    ctx.view.set_progress(Some(UploadStage::Converting));
    let base64_file = encode_file(path).await?;

    ctx.view.set_progress(Some(UploadStage::Uploading));
    let request = UploadRequest {
        filename: filename.to_string(),
        base64_file,
    };
    let response = ctx.api.upload(token, &request).await?;
    Ok(response.document_id)
}

fn remember(ctx: &mut AppContext, record: UploadRecord) {
    match ctx.store.push_recent_upload(record.clone()) {
        Ok(uploads) => ctx.recent_uploads = uploads,
        Err(e) => {
            tracing::warn!(error = %e, "failed to persist recent uploads");
            ctx.recent_uploads.insert(0, record);
            ctx.recent_uploads
                .truncate(crate::store::session::RECENT_UPLOADS_CAP);
        }
    }
}

fn failure_message(err: &ClientError) -> String {
    match err {
        ClientError::Http { status, body } => match err.server_message() {
            Some(msg) => format!("Upload failed ({}): {}", status, msg),
            None => format!("Upload failed ({}): {}", status, body),
        },
        other => other.to_string(),
    }
}
