use super::IReminderMessageRepo;
use nudge_domain::{ChannelKind, ReminderMessage, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresReminderMessageRepo {
    pool: PgPool,
}

impl PostgresReminderMessageRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderMessageRaw {
    message_uid: Uuid,
    user_uid: Uuid,
    channel: String,
    content: String,
    sent_at: i64,
}

impl Into<ReminderMessage> for ReminderMessageRaw {
    fn into(self) -> ReminderMessage {
        ReminderMessage {
            id: self.message_uid.into(),
            user_id: self.user_uid.into(),
            channel: self
                .channel
                .parse()
                .expect("Channel kind stored in database to be valid"),
            content: self.content,
            sent_at: self.sent_at,
        }
    }
}

#[async_trait::async_trait]
impl IReminderMessageRepo for PostgresReminderMessageRepo {
    async fn insert(&self, message: &ReminderMessage) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminder_messages(message_uid, user_uid, channel, content, sent_at)
            VALUES($1, $2, $3, $4, $5)
            "#,
        )
        .bind(message.id.inner_ref())
        .bind(message.user_id.inner_ref())
        .bind(message.channel.as_str())
        .bind(&message.content)
        .bind(message.sent_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_for_user_since(
        &self,
        user_id: &ID,
        channel: ChannelKind,
        since: i64,
    ) -> anyhow::Result<Vec<ReminderMessage>> {
        let messages = sqlx::query_as::<_, ReminderMessageRaw>(
            r#"
            SELECT * FROM reminder_messages AS m
            WHERE m.user_uid = $1 AND m.channel = $2 AND m.sent_at >= $3
            "#,
        )
        .bind(user_id.inner_ref())
        .bind(channel.as_str())
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages.into_iter().map(|m| m.into()).collect())
    }
}
