//! Raw material breakdown resolution
//!
//! The expansion of a recipe into raw materials happens in an external
//! service. This module only defines the contract the client relies on.

use async_trait::async_trait;
use tracing::warn;

use crate::error::ResolveError;
use crate::models::Breakdown;

/// Expands `(recipe id, quantity)` into a [`Breakdown`]
#[async_trait]
pub trait BreakdownResolver: Send + Sync {
    /// One round trip to the resolver, reporting why it failed
    async fn try_resolve(&self, recipe_id: &str, quantity: u64) -> Result<Breakdown, ResolveError>;

    /// Never fails: any error is logged and collapses to the empty breakdown
    ///
    /// From the returned value alone, a failure cannot be told apart from a
    /// recipe that legitimately needs nothing.
    async fn resolve(&self, recipe_id: &str, quantity: u64) -> Breakdown {
        match self.try_resolve(recipe_id, quantity).await {
            Ok(breakdown) => breakdown,
            Err(e) => {
                warn!("Error fetching raw material breakdown for {} (x{}): {}", recipe_id, quantity, e);
                Breakdown::default()
            }
        }
    }

    /// Human-readable name for this resolver (for logging)
    fn name(&self) -> &str;
}
