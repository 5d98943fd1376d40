use crate::api::models::SearchQuery;
use crate::error::ClientResult;
use crate::ops::AppContext;
use crate::view::controller::SearchPanel;
use crate::view::format::ResultCard;

/// Run a search and render it. Returns the number of hits.
pub async fn search(ctx: &mut AppContext, query: &SearchQuery) -> ClientResult<usize> {
    let token = ctx.require_session()?;
    ctx.view.search = SearchPanel::Searching;

    match ctx.api.search(&token, query).await {
        Ok(response) => {
            let count = response.results.len();
            tracing::debug!(query = %query.text, count, "search complete");
            ctx.view.search = if response.results.is_empty() {
                SearchPanel::Empty
            } else {
                SearchPanel::Results(response.results.iter().map(ResultCard::from).collect())
            };
            Ok(count)
        }
        Err(e) => {
            tracing::warn!(error = %e, "search failed");
            ctx.view.search = SearchPanel::Failed(e.user_message("Search request failed"));
            Err(e)
        }
    }
}
