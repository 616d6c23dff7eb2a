use super::IProductRepo;
use nudge_domain::Product;
use sqlx::{FromRow, PgPool};

pub struct PostgresProductRepo {
    pool: PgPool,
}

impl PostgresProductRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProductRaw {
    product_id: String,
    name: String,
    description: Option<String>,
}

impl Into<Product> for ProductRaw {
    fn into(self) -> Product {
        Product {
            id: self.product_id,
            name: self.name,
            description: self.description,
        }
    }
}

#[async_trait::async_trait]
impl IProductRepo for PostgresProductRepo {
    async fn insert(&self, product: &Product) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products(product_id, name, description)
            VALUES($1, $2, $3)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, product_id: &str) -> Option<Product> {
        sqlx::query_as::<_, ProductRaw>(
            r#"
            SELECT * FROM products AS p
            WHERE p.product_id = $1
            "#,
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await
        .ok()
        .map(|p| p.into())
    }
}
