mod inmemory;
mod postgres;

pub use inmemory::InMemoryProductRepo;
use nudge_domain::Product;
pub use postgres::PostgresProductRepo;

#[async_trait::async_trait]
pub trait IProductRepo: Send + Sync {
    async fn insert(&self, product: &Product) -> anyhow::Result<()>;
    /// Lookup by the storefront supplied identifier
    async fn find(&self, product_id: &str) -> Option<Product>;
}
