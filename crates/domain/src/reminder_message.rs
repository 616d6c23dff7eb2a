use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Channel a reminder was sent through. Stored as its snake_case string
/// form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    Email,
    Sms,
    Push,
    InApp,
    Chat,
}

impl ChannelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
            Self::Push => "push",
            Self::InApp => "in_app",
            Self::Chat => "chat",
        }
    }
}

impl Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum InvalidChannelKindError {
    #[error("Channel kind: {0} is not recognized")]
    Unrecognized(String),
}

impl FromStr for ChannelKind {
    type Err = InvalidChannelKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "sms" => Ok(Self::Sms),
            "push" => Ok(Self::Push),
            "in_app" => Ok(Self::InApp),
            "chat" => Ok(Self::Chat),
            _ => Err(InvalidChannelKindError::Unrecognized(s.to_string())),
        }
    }
}

/// A reminder that was recorded for a user. Immutable. Its existence within
/// the cooldown window is what makes the user ineligible for another
/// reminder.
#[derive(Debug, Clone)]
pub struct ReminderMessage {
    pub id: ID,
    pub user_id: ID,
    pub channel: ChannelKind,
    pub content: String,
    /// Epoch millis
    pub sent_at: i64,
}

impl ReminderMessage {
    pub fn new(user_id: ID, channel: ChannelKind, content: String, sent_at: i64) -> Self {
        Self {
            id: Default::default(),
            user_id,
            channel,
            content,
            sent_at,
        }
    }
}

impl Entity for ReminderMessage {
    fn id(&self) -> &ID {
        &self.id
    }
}
