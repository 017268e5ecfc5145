//! Source fetcher
//!
//! Builds upstream URLs and retrieves raw records: one request for a comment
//! feed, one request per layer for a WFS feed. Layer requests share an
//! immutable base query and run with bounded concurrency; results come back in
//! configured layer order and the first failure aborts the whole fetch.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::{stream, StreamExt, TryStreamExt};
use url::Url;

use crate::domain::entities::{CommentsSource, Extent, WfsSource, TYPENAME_PARAM};
use crate::domain::ports::{CommentRecord, GeoFeature, UpstreamClient};
use crate::error::{AppError, UpstreamError};

/// Fixed page size of every WFS GetFeature request
pub const WFS_PAGE_SIZE: u32 = 20;

/// Raw features of one layer
#[derive(Debug, Clone)]
pub struct LayerBatch {
    pub layer: String,
    pub features: Vec<GeoFeature>,
}

/// Query shared by every layer request of a feed.
///
/// Parameters already present on the OWS URL are kept; protocol constants
/// replace same-named ones.
pub fn base_query(ows_url: &Url, projection: &str, extent: &Extent) -> BTreeMap<String, String> {
    let mut query: BTreeMap<String, String> = ows_url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let constants = [
        ("VERSION", "1.1.0".to_string()),
        ("SERVICE", "WFS".to_string()),
        ("REQUEST", "GetFeature".to_string()),
        ("OUTPUTFORMAT", "GeoJSON".to_string()),
        ("STARTINDEX", "0".to_string()),
        ("MAXFEATURES", WFS_PAGE_SIZE.to_string()),
        ("SRSNAME", projection.to_string()),
    ];
    for (key, value) in constants {
        query.insert(key.to_string(), value);
    }

    if let Some(bbox) = extent.bbox_param() {
        query.insert("BBOX".to_string(), bbox);
    }

    query
}

/// Query for one layer: base, then the feed's extra parameters, then `TYPENAME`
pub fn layer_query(
    base: &BTreeMap<String, String>,
    source: &WfsSource,
    layer: &str,
) -> BTreeMap<String, String> {
    let mut query = base.clone();
    for (key, value) in &source.params {
        query.insert(key.clone(), value.to_query_value());
    }
    query.insert(TYPENAME_PARAM.to_string(), layer.to_string());
    query
}

/// `url` with its query string replaced by `query`
pub fn with_query(url: &Url, query: &BTreeMap<String, String>) -> Url {
    let mut url = url.clone();
    url.set_query(None);
    url.query_pairs_mut().extend_pairs(query.iter());
    url
}

/// First page of the comment service, scoped to the configured application
pub fn comments_url(source: &CommentsSource) -> Url {
    let mut url = source.url.clone();
    url.query_pairs_mut()
        .append_pair("page", "1")
        .append_pair("appId", &source.app_id);
    url
}

pub struct SourceFetcher<C>
where
    C: UpstreamClient,
{
    client: Arc<C>,
    ows_url: Option<Url>,
    projection: String,
    concurrency: usize,
}

impl<C> SourceFetcher<C>
where
    C: UpstreamClient,
{
    pub fn new(
        client: Arc<C>,
        ows_url: Option<Url>,
        projection: String,
        concurrency: usize,
    ) -> Self {
        Self {
            client,
            ows_url,
            projection,
            concurrency: concurrency.max(1),
        }
    }

    /// Comments of the first page only; later pages are never requested.
    pub async fn fetch_comments(
        &self,
        source: &CommentsSource,
    ) -> Result<Vec<CommentRecord>, UpstreamError> {
        let url = comments_url(source);
        let page = self.client.get_comments(&url).await?;
        tracing::debug!(
            "Fetched {} of {} comments",
            page.data.data.len(),
            page.data.comment_count
        );
        Ok(page.data.data)
    }

    /// One batch per configured layer, in configured order.
    pub async fn fetch_layers(
        &self,
        source: &WfsSource,
        extent: &Extent,
    ) -> Result<Vec<LayerBatch>, AppError> {
        let ows_url = self
            .ows_url
            .as_ref()
            .ok_or_else(|| AppError::Internal("ows_url is not configured".to_string()))?;

        let base = base_query(ows_url, &self.projection, extent);

        // Requests own their inputs: the handler future must be `Send`
        let requests: Vec<_> = source
            .layers
            .iter()
            .map(|layer| {
                let client = Arc::clone(&self.client);
                let url = with_query(ows_url, &layer_query(&base, source, layer));
                let layer = layer.clone();
                async move {
                    let collection = client.get_features(&url).await?;
                    tracing::debug!(
                        "Layer {} returned {} features",
                        layer,
                        collection.features.len()
                    );
                    Ok::<_, UpstreamError>(LayerBatch {
                        layer,
                        features: collection.features,
                    })
                }
            })
            .collect();

        let batches: Vec<LayerBatch> = stream::iter(requests)
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        Ok(batches)
    }
}
