use crate::error::NudgeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chrono::DateTime;
use nudge_api_structs::dtos::ViewEventDTO;
use nudge_api_structs::record_view::{APIResponse, RequestBody};
use nudge_domain::{validate_email, Product, User, ViewEvent, ID};
use nudge_infra::NudgeContext;
use tracing::warn;

pub async fn record_view_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<NudgeContext>,
) -> Result<HttpResponse, NudgeError> {
    let body = body.into_inner();
    let usecase = RecordViewUseCase {
        user_email: body.user_email,
        product_id: body.product_id,
        product_name: body.product_name,
        timestamp: body.timestamp,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(ViewEventDTO::new(res.view))))
        .map_err(NudgeError::from)
}

/// Validates and persists a single product view, resolving the user and
/// product records on the way.
#[derive(Debug)]
pub struct RecordViewUseCase {
    pub user_email: Option<String>,
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    /// RFC 3339 instant. Defaults to now when omitted.
    pub timestamp: Option<String>,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub view: ViewEvent,
}

#[derive(Debug)]
pub enum UseCaseError {
    MissingField(&'static str),
    InvalidEmail(String),
    InvalidTimestamp(String),
    StorageError(String),
}

impl From<UseCaseError> for NudgeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::MissingField(field) => Self::BadClientData(format!(
                "Required field `{}` is missing or empty",
                field
            )),
            UseCaseError::InvalidEmail(email) => {
                Self::BadClientData(format!("`{}` is not a valid email address", email))
            }
            UseCaseError::InvalidTimestamp(ts) => {
                Self::BadClientData(format!("`{}` is not a valid ISO-8601 timestamp", ts))
            }
            UseCaseError::StorageError(details) => Self::PersistenceFailure(details),
        }
    }
}

fn non_empty(field: &'static str, value: &Option<String>) -> Result<String, UseCaseError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(UseCaseError::MissingField(field)),
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RecordViewUseCase {
    type Response = UseCaseRes;
    type Error = UseCaseError;

    const NAME: &'static str = "RecordView";

    async fn execute(&mut self, ctx: &NudgeContext) -> Result<Self::Response, Self::Error> {
        let product_id = non_empty("product_id", &self.product_id)?;
        let product_name = non_empty("product_name", &self.product_name)?;

        let viewed_at = match &self.timestamp {
            Some(ts) => DateTime::parse_from_rfc3339(ts)
                .map_err(|_| UseCaseError::InvalidTimestamp(ts.clone()))?
                .timestamp_millis(),
            None => ctx.sys.get_timestamp_millis(),
        };

        let user_id = match &self.user_email {
            Some(email) => {
                let email = email.trim().to_lowercase();
                if !validate_email(&email) {
                    return Err(UseCaseError::InvalidEmail(email));
                }
                resolve_user(&email, ctx).await
            }
            None => None,
        };

        resolve_product(&product_id, &product_name, ctx).await;

        // Only the view insert itself is a hard failure. Everything above
        // degrades to an anonymous or product-less view.
        let view = ViewEvent::new(user_id, product_id, product_name, viewed_at);
        ctx.repos
            .view_events
            .insert(&view)
            .await
            .map_err(|e| UseCaseError::StorageError(e.to_string()))?;

        Ok(UseCaseRes { view })
    }
}

/// Find-or-create by email. Existing records are never overwritten.
async fn resolve_user(email: &str, ctx: &NudgeContext) -> Option<ID> {
    if let Some(user) = ctx.repos.users.find_by_email(email).await {
        return Some(user.id);
    }

    let user = User::new(email);
    match ctx.repos.users.insert(&user).await {
        Ok(_) => Some(user.id),
        Err(e) => {
            // A concurrent insert for the same email may have won. The unique
            // constraint makes the re-fetch authoritative.
            if let Some(existing) = ctx.repos.users.find_by_email(email).await {
                return Some(existing.id);
            }
            warn!(
                "Could not resolve user for {}: {:?}. Recording the view without a user reference.",
                email, e
            );
            None
        }
    }
}

/// Find-or-create by the supplied id. The name stored on first creation
/// stays; later views only snapshot their own name on the event itself.
async fn resolve_product(product_id: &str, product_name: &str, ctx: &NudgeContext) {
    if ctx.repos.products.find(product_id).await.is_some() {
        return;
    }

    let product = Product::new(product_id, product_name);
    if let Err(e) = ctx.repos.products.insert(&product).await {
        warn!(
            "Could not create product {}: {:?}. Recording the view anyway.",
            product_id, e
        );
    }
}
