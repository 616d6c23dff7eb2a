use super::{DeliveryError, DeliveryReceipt, ISmsSender};
use crate::config::TwilioConfig;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// SMS delivery through the Twilio Messages endpoint
pub struct TwilioSmsApi {
    client: Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioSmsApi {
    pub fn new(config: TwilioConfig) -> Self {
        Self {
            client: Client::new(),
            account_sid: config.account_sid,
            auth_token: config.auth_token,
            from_number: config.from_number,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TwilioMessageResponse {
    sid: String,
}

#[async_trait::async_trait]
impl ISmsSender for TwilioSmsApi {
    async fn send(&self, to: &str, body: &str) -> Result<DeliveryReceipt, DeliveryError> {
        let url = format!(
            "{}/Accounts/{}/Messages.json",
            TWILIO_API_BASE, self.account_sid
        );
        let params = [
            ("From", self.from_number.as_str()),
            ("To", to),
            ("Body", body),
        ];

        let res = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| DeliveryError(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            // Twilio error bodies carry a human readable `message` field
            let detail = res
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v["message"].as_str().map(String::from))
                .unwrap_or_else(|| format!("Unexpected status code: {}", status));
            return Err(DeliveryError(detail));
        }

        let message: TwilioMessageResponse =
            res.json().await.map_err(|e| DeliveryError(e.to_string()))?;

        Ok(DeliveryReceipt { sid: message.sid })
    }
}
