mod inmemory;
mod postgres;

pub use inmemory::InMemoryViewEventRepo;
use nudge_domain::ViewEvent;
pub use postgres::PostgresViewEventRepo;

#[async_trait::async_trait]
pub trait IViewEventRepo: Send + Sync {
    async fn insert(&self, event: &ViewEvent) -> anyhow::Result<()>;
    /// All view events with a timestamp at or after `since`, oldest first.
    /// A failure here is tick-fatal for the scanner, so errors are surfaced
    /// rather than swallowed.
    async fn find_since(&self, since: i64) -> anyhow::Result<Vec<ViewEvent>>;
}
