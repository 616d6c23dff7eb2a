use super::IViewEventRepo;
use crate::repos::shared::inmemory_repo::*;
use nudge_domain::ViewEvent;

pub struct InMemoryViewEventRepo {
    view_events: std::sync::Mutex<Vec<ViewEvent>>,
}

impl InMemoryViewEventRepo {
    pub fn new() -> Self {
        Self {
            view_events: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IViewEventRepo for InMemoryViewEventRepo {
    async fn insert(&self, event: &ViewEvent) -> anyhow::Result<()> {
        insert(event, &self.view_events);
        Ok(())
    }

    async fn find_since(&self, since: i64) -> anyhow::Result<Vec<ViewEvent>> {
        let mut events = find_by(&self.view_events, |e| e.viewed_at >= since);
        events.sort_by_key(|e| e.viewed_at);
        Ok(events)
    }
}
