use super::IReminderMessageRepo;
use crate::repos::shared::inmemory_repo::*;
use nudge_domain::{ChannelKind, ReminderMessage, ID};

pub struct InMemoryReminderMessageRepo {
    messages: std::sync::Mutex<Vec<ReminderMessage>>,
}

impl InMemoryReminderMessageRepo {
    pub fn new() -> Self {
        Self {
            messages: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IReminderMessageRepo for InMemoryReminderMessageRepo {
    async fn insert(&self, message: &ReminderMessage) -> anyhow::Result<()> {
        insert(message, &self.messages);
        Ok(())
    }

    async fn find_for_user_since(
        &self,
        user_id: &ID,
        channel: ChannelKind,
        since: i64,
    ) -> anyhow::Result<Vec<ReminderMessage>> {
        Ok(find_by(&self.messages, |m| {
            m.user_id == *user_id && m.channel == channel && m.sent_at >= since
        }))
    }
}
