use crate::{KeywordStats, Result};
use async_trait::async_trait;

/// Monthly search statistics feed (signed ad-platform API).
///
/// Implementations must fail fast with a bounded timeout; callers treat any
/// error as "this tier is unavailable" and advance to the next fallback.
#[async_trait]
pub trait KeywordStatsSource: Send + Sync {
    /// Fetch statistics for a batch of keywords. The service caps batch
    /// size; implementations may truncate or chunk.
    async fn keyword_stats(&self, keywords: &[String]) -> Result<Vec<KeywordStats>>;

    /// Whether credentials are configured at all. Lets callers skip the
    /// network round-trip when the tier cannot possibly answer.
    fn is_configured(&self) -> bool;
}

/// Count of competing listings for a keyword in local search.
#[async_trait]
pub trait ListingCountSource: Send + Sync {
    async fn listing_count(&self, keyword: &str) -> Result<u64>;

    fn is_configured(&self) -> bool;
}

/// Approximate resident population of an administrative region.
#[async_trait]
pub trait PopulationSource: Send + Sync {
    /// `None` means the region is unknown to every tier of the directory;
    /// the volume estimator then falls through to its length heuristic.
    async fn population(&self, location: &str) -> Option<u64>;
}
