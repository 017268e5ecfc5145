//! Extent resolver
//!
//! Decides which bounding box a WFS feed is queried with. Precedence, highest
//! first: an explicit `bbox` parameter, a `city` bookmark from the remote
//! project configuration, the project's zoom extent, the static default.
//!
//! Resolution never fails. Anything that made it fall back is reported as an
//! [`ExtentWarning`] so callers can log it or reject the request.

use std::fmt;
use std::sync::Arc;

use url::{form_urlencoded, Url};

use crate::config::{BookmarkSettings, FeedsConfig};
use crate::domain::entities::{Extent, ExtentParseError};
use crate::domain::ports::UpstreamClient;

/// Query parameters a feed request may carry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedQuery {
    pub bbox: Option<String>,
    pub city: Option<String>,
}

impl FeedQuery {
    /// Read `bbox` and `city` from a raw query string.
    ///
    /// The first occurrence of a repeated key wins; unknown keys are ignored.
    pub fn from_query_string(raw: &str) -> Self {
        let mut query = Self::default();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "bbox" if query.bbox.is_none() => query.bbox = Some(value.into_owned()),
                "city" if query.city.is_none() => query.city = Some(value.into_owned()),
                _ => {}
            }
        }
        query
    }

    /// Cache key for the feed at `path`: only the parameters that shape it count.
    pub fn cache_key(&self, path: &str) -> String {
        format!("{} bbox={:?} city={:?}", path, self.bbox, self.city)
    }
}

/// Where the resolved extent came from
#[derive(Debug, Clone, PartialEq)]
pub enum ExtentOrigin {
    BoundingBox,
    Bookmark { city: String },
    ZoomExtent,
    Default,
}

/// Why resolution fell back to a lower-precedence extent
#[derive(Debug, Clone, PartialEq)]
pub enum ExtentWarning {
    InvalidBoundingBox {
        input: String,
        reason: ExtentParseError,
    },
    ProjectConfigUnavailable(String),
    BookmarkNotFound {
        group: String,
        city: String,
    },
}

impl fmt::Display for ExtentWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtentWarning::InvalidBoundingBox { input, reason } => {
                write!(f, "invalid bbox {:?}: {}", input, reason)
            }
            ExtentWarning::ProjectConfigUnavailable(msg) => {
                write!(f, "project configuration unavailable: {}", msg)
            }
            ExtentWarning::BookmarkNotFound { group, city } => {
                write!(f, "bookmark {}/{} not found", group, city)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedExtent {
    pub extent: Extent,
    pub origin: ExtentOrigin,
    pub warnings: Vec<ExtentWarning>,
}

impl ResolvedExtent {
    fn fallback(extent: Extent, warning: Option<ExtentWarning>) -> Self {
        Self {
            extent,
            origin: ExtentOrigin::Default,
            warnings: warning.into_iter().collect(),
        }
    }

    pub fn invalid_bbox(&self) -> Option<&ExtentWarning> {
        self.warnings
            .iter()
            .find(|w| matches!(w, ExtentWarning::InvalidBoundingBox { .. }))
    }
}

pub struct ExtentResolver<C>
where
    C: UpstreamClient,
{
    client: Arc<C>,
    project_url: Option<Url>,
    bookmarks: BookmarkSettings,
    default_extent: Extent,
}

impl<C> ExtentResolver<C>
where
    C: UpstreamClient,
{
    pub fn new(client: Arc<C>, config: &FeedsConfig) -> Self {
        Self {
            client,
            project_url: config.project_url.clone(),
            bookmarks: config.bookmarks.clone(),
            default_extent: config.default_extent,
        }
    }

    pub async fn resolve(&self, query: &FeedQuery) -> ResolvedExtent {
        let resolved = if let Some(raw) = &query.bbox {
            match raw.parse::<Extent>() {
                Ok(extent) => ResolvedExtent {
                    extent,
                    origin: ExtentOrigin::BoundingBox,
                    warnings: Vec::new(),
                },
                Err(reason) => ResolvedExtent::fallback(
                    self.default_extent,
                    Some(ExtentWarning::InvalidBoundingBox {
                        input: raw.clone(),
                        reason,
                    }),
                ),
            }
        } else if let Some(city) = &query.city {
            self.resolve_city(city).await
        } else {
            ResolvedExtent::fallback(self.default_extent, None)
        };

        for warning in &resolved.warnings {
            tracing::warn!("Extent fallback: {}", warning);
        }

        resolved
    }

    async fn resolve_city(&self, city: &str) -> ResolvedExtent {
        let Some(project_url) = &self.project_url else {
            return ResolvedExtent::fallback(
                self.default_extent,
                Some(ExtentWarning::ProjectConfigUnavailable(
                    "project_url is not configured".to_string(),
                )),
            );
        };

        let project = match self.client.get_project_config(project_url).await {
            Ok(project) => project,
            Err(e) => {
                return ResolvedExtent::fallback(
                    self.default_extent,
                    Some(ExtentWarning::ProjectConfigUnavailable(e.to_string())),
                )
            }
        };

        let mut resolved = match Extent::from_slice(&project.zoom_extent) {
            Some(extent) => ResolvedExtent {
                extent,
                origin: ExtentOrigin::ZoomExtent,
                warnings: Vec::new(),
            },
            None => ResolvedExtent::fallback(self.default_extent, None),
        };

        let city = if city.is_empty() {
            self.bookmarks.default_city.as_str()
        } else {
            city
        };

        match project
            .bookmark(&self.bookmarks.group, city)
            .and_then(|b| Extent::from_slice(&b.extent))
        {
            Some(extent) => {
                resolved.extent = extent;
                resolved.origin = ExtentOrigin::Bookmark {
                    city: city.to_string(),
                };
            }
            None => resolved.warnings.push(ExtentWarning::BookmarkNotFound {
                group: self.bookmarks.group.clone(),
                city: city.to_string(),
            }),
        }

        resolved
    }
}
