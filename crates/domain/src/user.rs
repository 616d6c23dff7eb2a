use crate::shared::entity::{Entity, ID};

/// A `User` is created lazily the first time an email address shows up on a
/// view event. The phone number is owned by the surrounding platform; this
/// service only reads it when delivering an SMS.
#[derive(Debug, Clone)]
pub struct User {
    pub id: ID,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

impl User {
    pub fn new<T: Into<String>>(email: T) -> Self {
        Self {
            id: Default::default(),
            email: email.into(),
            full_name: None,
            phone: None,
        }
    }

    /// Name used when addressing the user in a reminder. Falls back to the
    /// local part of the email address.
    pub fn recipient_name(&self) -> &str {
        match &self.full_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}
