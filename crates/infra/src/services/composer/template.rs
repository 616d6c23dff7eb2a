use super::{sanitize_message, validate_request, ComposeRequest, ComposerError, IMessageComposer};
use nudge_domain::Urgency;

/// Deterministic composer used when no text generation API key is
/// configured. Keeps local development and tests independent of the
/// upstream API while honoring the same contract.
pub struct TemplateComposer;

#[async_trait::async_trait]
impl IMessageComposer for TemplateComposer {
    async fn compose(&self, req: &ComposeRequest) -> Result<String, ComposerError> {
        validate_request(req)?;

        let mut text = match req.urgency {
            Urgency::Low => format!(
                "Hi {}! {} is still in your cart whenever you're ready.",
                req.recipient_name, req.product_text
            ),
            Urgency::Medium => format!(
                "Hi {}! Don't forget about {} waiting in your cart.",
                req.recipient_name, req.product_text
            ),
            Urgency::High => format!(
                "Hi {}! Last chance - {} is about to leave your cart!",
                req.recipient_name, req.product_text
            ),
        };
        if let Some(link) = &req.checkout_link {
            text.push(' ');
            text.push_str(link);
        }

        Ok(sanitize_message(&text))
    }
}
