//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod upstream;

pub use upstream::{
    CommentPage, CommentRecord, FeatureCollection, GeoFeature, ProjectConfig, UpstreamClient,
};
