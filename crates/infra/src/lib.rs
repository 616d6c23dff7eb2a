mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, OpenAiConfig, TwilioConfig};
pub use repos::{IProductRepo, IReminderMessageRepo, IUserRepo, IViewEventRepo, Repos};
pub use services::{
    ComposeRequest, ComposerError, DeliveryError, DeliveryReceipt, IMessageComposer, ISmsSender,
    OpenAiComposer, TemplateComposer, TwilioSmsApi, UnconfiguredSms,
};
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
pub use system::ISys;
pub use system::RealSys;
use tracing::warn;

/// Everything the handlers and the scanner need, constructed once at startup
/// and passed around explicitly. No ambient globals.
#[derive(Clone)]
pub struct NudgeContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub composer: Arc<dyn IMessageComposer>,
    pub sms: Arc<dyn ISmsSender>,
    /// Set while a scanner tick is running. Refuses overlapping ticks from
    /// the timer and the manual trigger.
    pub scanner_lock: Arc<AtomicBool>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl NudgeContext {
    async fn create(params: ContextParams) -> Self {
        let mut config = Config::new();
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");

        let composer = create_composer(&config);
        let sms = create_sms_sender(&mut config);

        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            composer,
            sms,
            scanner_lock: Arc::new(AtomicBool::new(false)),
        }
    }
}

fn create_composer(config: &Config) -> Arc<dyn IMessageComposer> {
    match &config.openai {
        Some(openai) => Arc::new(OpenAiComposer::new(
            openai.api_key.clone(),
            openai.model.clone(),
        )),
        None => {
            warn!("OPENAI_API_KEY is not set. Falling back to template based reminder messages.");
            Arc::new(TemplateComposer)
        }
    }
}

fn create_sms_sender(config: &mut Config) -> Arc<dyn ISmsSender> {
    match config.twilio.clone() {
        Some(twilio) => Arc::new(TwilioSmsApi::new(twilio)),
        None => {
            if !config.dry_run {
                warn!("Twilio credentials are not set. Forcing dry-run mode.");
                config.dry_run = true;
            }
            Arc::new(UnconfiguredSms)
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> NudgeContext {
    NudgeContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

/// Context backed by in-memory repositories, the template composer and
/// dry-run delivery. Used by tests and available for local experiments.
/// The background scanner is disabled; ticks run through the manual trigger.
pub fn setup_context_inmemory() -> NudgeContext {
    let mut config = Config::new();
    config.dry_run = true;
    config.pacing_delay_millis = 0;
    config.scan_interval_minutes = 0;

    NudgeContext {
        repos: Repos::create_inmemory(),
        config,
        sys: Arc::new(RealSys {}),
        composer: Arc::new(TemplateComposer),
        sms: Arc::new(UnconfiguredSms),
        scanner_lock: Arc::new(AtomicBool::new(false)),
    }
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string())
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
