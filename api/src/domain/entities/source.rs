//! Feed definitions
//!
//! Typed, load-time validated description of where a feed's records come from
//! and how they map onto [`FeedItem`](super::FeedItem) fields.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use url::Url;

/// Item cap applied to merged multi-layer feeds when none is configured
pub const DEFAULT_ITEM_CAP: usize = 20;

/// Extra query parameter name that doubles as the merged-feed item cap
pub const MAX_FEATURES_PARAM: &str = "MAXFEATURES";

/// Reserved parameter: the layer list owns it
pub const TYPENAME_PARAM: &str = "TYPENAME";

/// Which upstream properties supply each feed item field.
///
/// Every key is optional; a missing key or a missing property produces an
/// empty value, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FieldMapping {
    /// Property holding the identifier. Falls back to the feature's native id.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "updated_at")]
    pub timestamp: Option<String>,
}

/// Value of an extra upstream query parameter
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// Query-string form: scalars stringified, lists joined by commas
    pub fn to_query_value(&self) -> String {
        match self {
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::Integer(i) => i.to_string(),
            ParamValue::Float(f) => f.to_string(),
            ParamValue::Text(s) => s.clone(),
            ParamValue::List(values) => values
                .iter()
                .map(ParamValue::to_query_value)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    fn as_count(&self) -> Option<usize> {
        match self {
            ParamValue::Integer(i) => usize::try_from(*i).ok(),
            ParamValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_value())
    }
}

/// Paginated comment service
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommentsSource {
    pub url: Url,
    pub app_id: String,
}

/// Multi-layer WFS source
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WfsSource {
    /// Layer (TYPENAME) names, fetched and merged in this order
    pub layers: Vec<String>,
    #[serde(default)]
    pub params: BTreeMap<String, ParamValue>,
    #[serde(default)]
    pub fields: FieldMapping,
}

impl WfsSource {
    /// Maximum number of items kept after merging several layers
    pub fn item_cap(&self) -> usize {
        self.params
            .get(MAX_FEATURES_PARAM)
            .and_then(ParamValue::as_count)
            .unwrap_or(DEFAULT_ITEM_CAP)
    }
}

/// Upstream source of a feed
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceSpec {
    Comments(CommentsSource),
    Wfs(WfsSource),
}

impl SourceSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            SourceSpec::Comments(_) => "comments",
            SourceSpec::Wfs(_) => "wfs",
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            SourceSpec::Comments(c) => {
                if c.app_id.trim().is_empty() {
                    return Err("comments source requires a non-empty app_id".to_string());
                }
            }
            SourceSpec::Wfs(w) => {
                if w.layers.is_empty() {
                    return Err("wfs source requires at least one layer".to_string());
                }
                if w.layers.iter().any(|l| l.trim().is_empty()) {
                    return Err("wfs layer names must not be blank".to_string());
                }
                if w.params.keys().any(|k| k.eq_ignore_ascii_case(TYPENAME_PARAM)) {
                    return Err(format!(
                        "{} must be configured through `layers`, not `params`",
                        TYPENAME_PARAM
                    ));
                }
            }
        }
        Ok(())
    }
}

/// One servable feed: channel metadata plus its source
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedDefinition {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub language: Option<String>,
    pub source: SourceSpec,
}
