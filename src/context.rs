//! Common surface of the per-resource cached collections

use async_trait::async_trait;

use crate::error::Error;

/// A client-side cache of one backend entity family.
///
/// Implementors hold their collection behind a lock and follow the
/// refetch-after-write policy: a mutation never patches the cache directly,
/// it re-runs the full fetch. The trait exists so the session teardown can
/// walk every registered context and drop its cached data.
#[async_trait]
pub trait ResourceContext: Send + Sync {
    /// Replace the cached collection with the server's current snapshot
    async fn refresh(&self) -> Result<(), Error>;

    /// Drop the cached collection without contacting the server.
    ///
    /// Called on logout; the next `refresh` starts from empty.
    fn invalidate(&self);
}
