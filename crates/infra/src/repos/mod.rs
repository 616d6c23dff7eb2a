mod product;
mod reminder_message;
mod shared;
mod user;
mod view_event;

use product::{InMemoryProductRepo, PostgresProductRepo};
pub use product::IProductRepo;
use reminder_message::{InMemoryReminderMessageRepo, PostgresReminderMessageRepo};
pub use reminder_message::IReminderMessageRepo;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use user::{InMemoryUserRepo, PostgresUserRepo};
pub use user::IUserRepo;
use view_event::{InMemoryViewEventRepo, PostgresViewEventRepo};
pub use view_event::IViewEventRepo;

#[derive(Clone)]
pub struct Repos {
    pub users: Arc<dyn IUserRepo>,
    pub products: Arc<dyn IProductRepo>,
    pub view_events: Arc<dyn IViewEventRepo>,
    pub reminder_messages: Arc<dyn IReminderMessageRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            users: Arc::new(PostgresUserRepo::new(pool.clone())),
            products: Arc::new(PostgresProductRepo::new(pool.clone())),
            view_events: Arc::new(PostgresViewEventRepo::new(pool.clone())),
            reminder_messages: Arc::new(PostgresReminderMessageRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepo::new()),
            products: Arc::new(InMemoryProductRepo::new()),
            view_events: Arc::new(InMemoryViewEventRepo::new()),
            reminder_messages: Arc::new(InMemoryReminderMessageRepo::new()),
        }
    }
}
