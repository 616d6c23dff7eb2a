use super::IProductRepo;
use crate::repos::shared::inmemory_repo::*;
use nudge_domain::Product;

pub struct InMemoryProductRepo {
    products: std::sync::Mutex<Vec<Product>>,
}

impl InMemoryProductRepo {
    pub fn new() -> Self {
        Self {
            products: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IProductRepo for InMemoryProductRepo {
    async fn insert(&self, product: &Product) -> anyhow::Result<()> {
        insert(product, &self.products);
        Ok(())
    }

    async fn find(&self, product_id: &str) -> Option<Product> {
        let mut products = find_by(&self.products, |p| p.id == product_id);
        if products.is_empty() {
            return None;
        }
        Some(products.remove(0))
    }
}
