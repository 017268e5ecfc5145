//! Feed handlers
//!
//! Every path other than `/health` is a potential feed. The path is looked up
//! verbatim in the configured feed table.

use axum::{
    extract::{RawQuery, State},
    http::{header, Method, Uri},
    response::{IntoResponse, Response},
};

use crate::app::FeedQuery;
use crate::domain::ports::UpstreamClient;
use crate::error::AppError;
use crate::feed::{render_rss, RSS_CONTENT_TYPE};
use crate::AppState;

/// GET /{feed path}
///
/// Returns the feed configured for the request path as RSS 2.0.
/// Only `bbox` and `city` are read from the query string.
pub async fn serve_feed<C: UpstreamClient>(
    State(state): State<AppState<C>>,
    method: Method,
    uri: Uri,
    RawQuery(raw_query): RawQuery,
) -> Result<Response, AppError> {
    if method != Method::GET {
        return Err(AppError::MethodNotAllowed);
    }

    let query = FeedQuery::from_query_string(raw_query.as_deref().unwrap_or_default());
    let cache_key = query.cache_key(uri.path());

    if let Some(body) = state.cache.get(&cache_key).await {
        tracing::debug!("Cache hit for {}", cache_key);
        return Ok(rss_response(body));
    }

    let feed = state.feed_service.generate_feed(uri.path(), &query).await?;
    let body = render_rss(&feed)?;

    state.cache.insert(cache_key, body.clone()).await;

    Ok(rss_response(body))
}

fn rss_response(body: String) -> Response {
    ([(header::CONTENT_TYPE, RSS_CONTENT_TYPE)], body).into_response()
}
