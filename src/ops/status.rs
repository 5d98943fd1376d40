use crate::api::models::StatusRecord;
use crate::error::{ClientError, ClientResult};
use crate::ops::AppContext;
use crate::view::controller::{StatusPanel, Tab};
use crate::view::format::StatusEntry;

/// Newest first. Records without a usable timestamp sort as 0, i.e. last;
/// ties keep server order.
pub fn sort_history(mut history: Vec<StatusRecord>) -> Vec<StatusRecord> {
    history.sort_by(|a, b| b.sort_key().total_cmp(&a.sort_key()));
    history
}

/// Check the document named in the status input. Returns the history length.
pub async fn check_status(ctx: &mut AppContext) -> ClientResult<usize> {
    let token = ctx.require_session()?;

    let document_id = ctx.view.status_input.trim().to_string();
    if document_id.is_empty() {
        ctx.view.alert("Please enter document ID");
        return Err(ClientError::Validation(
            "Please enter document ID".to_string(),
        ));
    }

    ctx.view.status = StatusPanel::Checking;
    match ctx.api.status(&token, &document_id).await {
        Ok(response) => {
            let history = sort_history(response.history);
            tracing::debug!(%document_id, records = history.len(), "status fetched");
            ctx.view.status = match history.first() {
                None => StatusPanel::Empty,
                Some(latest) => StatusPanel::History {
                    current: StatusEntry::from(latest),
                    timeline: history.iter().map(StatusEntry::from).collect(),
                },
            };
            Ok(history.len())
        }
        Err(e) => {
            tracing::warn!(%document_id, error = %e, "status check failed");
            ctx.view.status = StatusPanel::Failed(e.user_message("Status check failed"));
            Err(e)
        }
    }
}

/// Jump from a recent upload to its status.
pub async fn view_recent_upload(ctx: &mut AppContext, index: usize) -> ClientResult<usize> {
    let Some(record) = ctx.recent_uploads.get(index) else {
        return Err(ClientError::Validation(format!(
            "No recent upload at position {}",
            index + 1
        )));
    };
    ctx.view.status_input = record.document_id.clone();
    ctx.view.show_tab(Tab::Status);
    check_status(ctx).await
}
