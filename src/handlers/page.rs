//! HTML page handlers

use axum::{
    extract::{rejection::PathRejection, Path, State},
    response::Html,
};
use std::sync::Arc;

use crate::error::{PreviewError, Result};
use crate::server::AppState;

/// Page served for `/`.
pub const INDEX_PAGE: &str = "index.html";

/// Serve the landing page
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    state.responder.render(INDEX_PAGE).await.map(Html)
}

/// Serve `/{filename}` from the asset root with the bridge injected
///
/// A name that cannot be decoded is answered like any other missing page.
pub async fn serve(
    State(state): State<Arc<AppState>>,
    filename: std::result::Result<Path<String>, PathRejection>,
) -> Result<Html<String>> {
    let Path(filename) = filename.map_err(|_| PreviewError::NotFound)?;
    state.responder.render(&filename).await.map(Html)
}
