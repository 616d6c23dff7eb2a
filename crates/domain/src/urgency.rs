use std::fmt::Display;

const MEDIUM_AFTER_MILLIS: i64 = 15 * 60 * 1000;
const HIGH_AFTER_MILLIS: i64 = 20 * 60 * 1000;

/// Coarse classification of how stale an abandoned cart is, measured from
/// the oldest qualifying view. Drives the tone of the generated reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    /// Lower bounds are exclusive: a cart that is exactly 20 minutes old is
    /// still `Medium` and one exactly 15 minutes old is still `Low`.
    pub fn from_elapsed_millis(age_millis: i64) -> Self {
        if age_millis > HIGH_AFTER_MILLIS {
            Self::High
        } else if age_millis > MEDIUM_AFTER_MILLIS {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_minutes_millis(minutes: f64) -> i64 {
        (minutes * 60.0 * 1000.0) as i64
    }

    #[test]
    fn classifies_around_the_tier_boundaries() {
        assert_eq!(
            Urgency::from_elapsed_millis(from_minutes_millis(14.0)),
            Urgency::Low
        );
        assert_eq!(
            Urgency::from_elapsed_millis(from_minutes_millis(15.0)),
            Urgency::Low
        );
        assert_eq!(
            Urgency::from_elapsed_millis(from_minutes_millis(15.01)),
            Urgency::Medium
        );
        assert_eq!(
            Urgency::from_elapsed_millis(from_minutes_millis(20.0)),
            Urgency::Medium
        );
        assert_eq!(
            Urgency::from_elapsed_millis(from_minutes_millis(20.01)),
            Urgency::High
        );
    }

    #[test]
    fn very_old_carts_are_high() {
        assert_eq!(
            Urgency::from_elapsed_millis(from_minutes_millis(35.0)),
            Urgency::High
        );
    }
}
