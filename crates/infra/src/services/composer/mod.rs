mod openai;
mod template;

use nudge_domain::Urgency;
pub use openai::OpenAiComposer;
pub use template::TemplateComposer;
use thiserror::Error;

/// Hard ceiling for a single SMS segment
pub const MAX_SMS_CHARS: usize = 160;

#[derive(Debug, Clone)]
pub struct ComposeRequest {
    pub recipient_name: String,
    /// Comma joined list of the distinct product names the reminder refers to
    pub product_text: String,
    pub urgency: Urgency,
    pub checkout_link: Option<String>,
}

#[derive(Error, Debug)]
pub enum ComposerError {
    #[error("Invalid compose request: {0}")]
    Validation(String),
    #[error("Text generation failed: {0}")]
    Generation(String),
}

/// Produces the reminder text for one user. Implementations must return
/// plain text no longer than [`MAX_SMS_CHARS`].
#[async_trait::async_trait]
pub trait IMessageComposer: Send + Sync {
    async fn compose(&self, req: &ComposeRequest) -> Result<String, ComposerError>;
}

pub(crate) fn validate_request(req: &ComposeRequest) -> Result<(), ComposerError> {
    if req.recipient_name.trim().is_empty() {
        return Err(ComposerError::Validation(
            "recipient name must not be empty".into(),
        ));
    }
    if req.product_text.trim().is_empty() {
        return Err(ComposerError::Validation(
            "product text must not be empty".into(),
        ));
    }
    Ok(())
}

/// Strips the wrapping quotes generators tend to add and enforces the single
/// segment length limit: anything longer than 160 chars is cut to 157 plus
/// an ellipsis.
pub(crate) fn sanitize_message(raw: &str) -> String {
    let text = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim();

    if text.chars().count() > MAX_SMS_CHARS {
        let truncated: String = text.chars().take(MAX_SMS_CHARS - 3).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}
