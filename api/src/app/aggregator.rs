//! Aggregator
//!
//! Merges per-layer item lists into one feed.

use crate::domain::entities::FeedItem;

/// Merge `layers` (one list per configured layer, in configured order).
///
/// A single configured layer passes through untouched, uncapped. Several layers
/// are concatenated, stably sorted newest first (undated items last) and cut
/// to `cap` items.
pub fn aggregate(layers: Vec<Vec<FeedItem>>, cap: usize) -> Vec<FeedItem> {
    if layers.len() == 1 {
        return layers.into_iter().flatten().collect();
    }

    let mut items: Vec<FeedItem> = layers.into_iter().flatten().collect();
    // `sort_by` is stable: equal timestamps keep concatenation order
    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    items.truncate(cap);
    items
}
