mod twilio;

use thiserror::Error;
pub use twilio::TwilioSmsApi;

/// Receipt handed back by the SMS provider for a dispatched message
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    pub sid: String,
}

#[derive(Error, Debug)]
#[error("SMS delivery failed: {0}")]
pub struct DeliveryError(pub String);

#[async_trait::async_trait]
pub trait ISmsSender: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<DeliveryReceipt, DeliveryError>;
}

/// Stand-in sender used when no SMS provider credentials are configured.
/// Setup forces dry-run mode in that case, so the scanner never calls it;
/// if something does, the error makes the misconfiguration obvious.
pub struct UnconfiguredSms;

#[async_trait::async_trait]
impl ISmsSender for UnconfiguredSms {
    async fn send(&self, _to: &str, _body: &str) -> Result<DeliveryReceipt, DeliveryError> {
        Err(DeliveryError("SMS provider is not configured".into()))
    }
}
