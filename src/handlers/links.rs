use crate::{auth::CallerIdentity, error::Error, models::LinkEntry, AppState};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct CreateParams {
    url: Option<String>,
}

/// GET /:key
///
/// Resolve the short key and answer with a 302 pointing at the original
/// URL. An unknown key (or an entry with an empty stored URL) is a 404 with
/// an empty body.
pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let url = state.service.resolve(&key).await?;
    Ok((StatusCode::FOUND, [(header::LOCATION, url)]))
}

/// POST /api/v1/links?url=<value>
///
/// Requires a prior Allow decision: the `CallerIdentity` extractor has
/// already run the access gateway and carries the principal that becomes
/// the entry's owner. A missing or empty `url` parameter is a 400 with an
/// empty body; success is 200 with `{"key": ..., "url": ...}` — the owner
/// identity stays server-side.
pub async fn create(
    State(state): State<Arc<AppState>>,
    CallerIdentity(owner): CallerIdentity,
    Query(params): Query<CreateParams>,
) -> Result<Json<LinkEntry>, Error> {
    let url = params
        .url
        .ok_or(Error::InvalidRequest("url query parameter is required"))?;

    let entry = state.service.create(&url, &owner).await?;
    Ok(Json(entry))
}
