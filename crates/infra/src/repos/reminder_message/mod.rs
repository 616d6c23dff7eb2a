mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderMessageRepo;
use nudge_domain::{ChannelKind, ReminderMessage, ID};
pub use postgres::PostgresReminderMessageRepo;

#[async_trait::async_trait]
pub trait IReminderMessageRepo: Send + Sync {
    async fn insert(&self, message: &ReminderMessage) -> anyhow::Result<()>;
    /// Reminders for one user on one channel sent at or after `since`. This
    /// is the cooldown/dedupe query the scanner runs per user group.
    async fn find_for_user_since(
        &self,
        user_id: &ID,
        channel: ChannelKind,
        since: i64,
    ) -> anyhow::Result<Vec<ReminderMessage>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn filters_by_user_channel_and_window() {
        let repo = InMemoryReminderMessageRepo::new();
        let jane = ID::new();
        let john = ID::new();

        repo.insert(&ReminderMessage::new(
            jane.clone(),
            ChannelKind::Sms,
            "come back".into(),
            1000,
        ))
        .await
        .expect("To insert message");
        repo.insert(&ReminderMessage::new(
            jane.clone(),
            ChannelKind::Email,
            "come back".into(),
            2000,
        ))
        .await
        .expect("To insert message");
        repo.insert(&ReminderMessage::new(
            john.clone(),
            ChannelKind::Sms,
            "come back".into(),
            2000,
        ))
        .await
        .expect("To insert message");

        let messages = repo
            .find_for_user_since(&jane, ChannelKind::Sms, 0)
            .await
            .expect("To find messages");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sent_at, 1000);

        // Window lower bound is inclusive
        let messages = repo
            .find_for_user_since(&jane, ChannelKind::Sms, 1000)
            .await
            .expect("To find messages");
        assert_eq!(messages.len(), 1);

        let messages = repo
            .find_for_user_since(&jane, ChannelKind::Sms, 1001)
            .await
            .expect("To find messages");
        assert!(messages.is_empty());
    }
}
