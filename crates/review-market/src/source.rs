//! Market data source seam

use crate::MarketSnapshot;
use async_trait::async_trait;

/// Produces the full market snapshot for a report run
///
/// Implementations never fail as a whole: a section that cannot be fetched
/// is logged and left at its empty default.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch every section of the snapshot
    async fn fetch_all(&self) -> MarketSnapshot;
}
