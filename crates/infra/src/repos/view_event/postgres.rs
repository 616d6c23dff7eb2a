use super::IViewEventRepo;
use nudge_domain::ViewEvent;
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresViewEventRepo {
    pool: PgPool,
}

impl PostgresViewEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ViewEventRaw {
    view_uid: Uuid,
    user_uid: Option<Uuid>,
    product_id: String,
    product_name: String,
    viewed_at: i64,
}

impl Into<ViewEvent> for ViewEventRaw {
    fn into(self) -> ViewEvent {
        ViewEvent {
            id: self.view_uid.into(),
            user_id: self.user_uid.map(|uid| uid.into()),
            product_id: self.product_id,
            product_name: self.product_name,
            viewed_at: self.viewed_at,
        }
    }
}

#[async_trait::async_trait]
impl IViewEventRepo for PostgresViewEventRepo {
    async fn insert(&self, event: &ViewEvent) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO view_events(view_uid, user_uid, product_id, product_name, viewed_at)
            VALUES($1, $2, $3, $4, $5)
            "#,
        )
        .bind(event.id.inner_ref())
        .bind(event.user_id.as_ref().map(|id| *id.inner_ref()))
        .bind(&event.product_id)
        .bind(&event.product_name)
        .bind(event.viewed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_since(&self, since: i64) -> anyhow::Result<Vec<ViewEvent>> {
        let events = sqlx::query_as::<_, ViewEventRaw>(
            r#"
            SELECT * FROM view_events AS v
            WHERE v.viewed_at >= $1
            ORDER BY v.viewed_at ASC
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(events.into_iter().map(|e| e.into()).collect())
    }
}
