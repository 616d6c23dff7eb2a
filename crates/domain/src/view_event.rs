use crate::shared::entity::{Entity, ID};
use chrono::{TimeZone, Utc};
use itertools::Itertools;

/// A timestamped fact that somebody looked at a product. Immutable once
/// recorded. Anonymous views carry no user reference.
#[derive(Debug, Clone)]
pub struct ViewEvent {
    pub id: ID,
    pub user_id: Option<ID>,
    pub product_id: String,
    /// Name snapshot taken at write time. Does not follow later renames of
    /// the `Product` record.
    pub product_name: String,
    /// Epoch millis
    pub viewed_at: i64,
}

impl ViewEvent {
    pub fn new(
        user_id: Option<ID>,
        product_id: String,
        product_name: String,
        viewed_at: i64,
    ) -> Self {
        Self {
            id: Default::default(),
            user_id,
            product_id,
            product_name,
            viewed_at,
        }
    }

    pub fn viewed_at_rfc3339(&self) -> String {
        Utc.timestamp_millis(self.viewed_at).to_rfc3339()
    }
}

impl Entity for ViewEvent {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// Distinct product ids and names across `views`, each in first-encounter
/// order after sorting by view timestamp.
pub fn distinct_viewed_products(views: &[ViewEvent]) -> (Vec<String>, Vec<String>) {
    let mut ordered: Vec<&ViewEvent> = views.iter().collect();
    ordered.sort_by_key(|v| v.viewed_at);

    let product_ids = ordered
        .iter()
        .map(|v| v.product_id.clone())
        .unique()
        .collect();
    let product_names = ordered
        .iter()
        .map(|v| v.product_name.clone())
        .unique()
        .collect();

    (product_ids, product_names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(product_id: &str, product_name: &str, viewed_at: i64) -> ViewEvent {
        ViewEvent::new(
            Some(Default::default()),
            product_id.into(),
            product_name.into(),
            viewed_at,
        )
    }

    #[test]
    fn dedupes_products_in_encounter_order() {
        let views = vec![
            view("p2", "Gadget", 2000),
            view("p1", "Widget", 1000),
            view("p1", "Widget", 3000),
        ];

        let (ids, names) = distinct_viewed_products(&views);
        assert_eq!(ids, vec!["p1".to_string(), "p2".to_string()]);
        assert_eq!(names, vec!["Widget".to_string(), "Gadget".to_string()]);
    }

    #[test]
    fn handles_empty_groups() {
        let (ids, names) = distinct_viewed_products(&[]);
        assert!(ids.is_empty());
        assert!(names.is_empty());
    }

    #[test]
    fn formats_rfc3339_timestamps() {
        let event = view("p1", "Widget", 1613862000000);
        assert_eq!(event.viewed_at_rfc3339(), "2021-02-20T23:00:00+00:00");
    }
}
