use super::{sanitize_message, validate_request, ComposeRequest, ComposerError, IMessageComposer};
use nudge_domain::Urgency;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Composer backed by the OpenAI chat completions API. The urgency tier
/// steers the tone of the prompt; length enforcement happens on our side
/// since the generator cannot be trusted to stay under the SMS limit.
pub struct OpenAiComposer {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiComposer {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
        }
    }

    fn prompt(req: &ComposeRequest) -> String {
        let tone = match req.urgency {
            Urgency::Low => "gentle and friendly",
            Urgency::Medium => "encouraging",
            Urgency::High => "time-sensitive but still polite",
        };
        let mut prompt = format!(
            "Write a single SMS reminding a customer about products left in their cart. \
             Tone: {}. Keep it under 160 characters, plain text, no quotes.\n\
             Customer name: {}\n\
             Products: {}",
            tone, req.recipient_name, req.product_text
        );
        if let Some(link) = &req.checkout_link {
            prompt.push_str(&format!("\nInclude this checkout link: {}", link));
        }
        prompt
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[async_trait::async_trait]
impl IMessageComposer for OpenAiComposer {
    async fn compose(&self, req: &ComposeRequest) -> Result<String, ComposerError> {
        validate_request(req)?;

        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: "You write short upbeat SMS reminders for an online store.".into(),
                },
                ChatMessage {
                    role: "user".into(),
                    content: Self::prompt(req),
                },
            ],
            max_tokens: 120,
            temperature: 0.7,
        };

        let res = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ComposerError::Generation(e.to_string()))?;

        if !res.status().is_success() {
            return Err(ComposerError::Generation(format!(
                "Unexpected status code: {}",
                res.status()
            )));
        }

        let res: ChatCompletionResponse = res
            .json()
            .await
            .map_err(|e| ComposerError::Generation(e.to_string()))?;

        let content = res
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ComposerError::Generation("Response contained no choices".into()))?;

        Ok(sanitize_message(&content))
    }
}
