use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use tracing::debug;

use crate::error::Error;
use crate::AppState;

/// presence of this query parameter, with any value, triggers invalidation
pub const CLEAR_CACHE_PARAM: &str = "clear-cache";
/// fixed body of the invalidation response
pub const CLEAR_CACHE_MESSAGE: &str = "Succeed clear swagger api cache.";

/// serve the assembled document as json
///
/// The invalidation check runs before anything else: when the flag is set the
/// cache entry is deleted and a plain-text confirmation is returned instead of
/// a document. The confirmation is only sent once the delete succeeded.
pub async fn serve_docs(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, Error> {
    if params.contains_key(CLEAR_CACHE_PARAM) {
        debug!("new request to clear the document cache");
        state.assembler.invalidate().await?;
        return Ok((StatusCode::OK, CLEAR_CACHE_MESSAGE).into_response());
    }
    debug!("new request for the document");
    let doc = state.assembler.assemble().await?;
    Ok(Json(doc).into_response())
}

/// serve the page embedding the document viewer
pub async fn serve_ui(State(state): State<AppState>) -> Result<Html<String>, Error> {
    debug!("new request for the UI page");
    Ok(Html(state.ui.render()?))
}
