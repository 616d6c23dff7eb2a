use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;

const DEFAULT_PORT: &str = "5000";
const DEFAULT_DETECTION_WINDOW_MINUTES: i64 = 30;
const DEFAULT_SCAN_INTERVAL_MINUTES: u64 = 10;
const DEFAULT_PACING_DELAY_MILLIS: u64 = 1000;
const DEFAULT_CHECKOUT_BASE_URL: &str = "http://localhost:3000/checkout";

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Minutes defining how recent a view event must be for the cart to
    /// count as abandoned
    pub detection_window_minutes: i64,
    /// Minutes a user stays ineligible after a reminder was recorded.
    /// Defaults to the detection window.
    pub cooldown_minutes: i64,
    /// Minutes between scanner ticks. `0` disables the background scanner,
    /// leaving only the manual trigger endpoint.
    pub scan_interval_minutes: u64,
    /// Base URL the generated checkout links point at
    pub checkout_base_url: String,
    /// When set, delivery calls are skipped and the intended send is logged
    /// instead
    pub dry_run: bool,
    /// Millis to pause between per-user processing within a tick, a
    /// rate-limit courtesy to the upstream APIs
    pub pacing_delay_millis: u64,
    pub openai: Option<OpenAiConfig>,
    pub twilio: Option<TwilioConfig>,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

impl Config {
    pub fn new() -> Self {
        let port = std::env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, DEFAULT_PORT
                );
                DEFAULT_PORT.parse::<usize>().unwrap()
            }
        };

        let detection_window_minutes = get_env_number(
            "DETECTION_WINDOW_MINUTES",
            DEFAULT_DETECTION_WINDOW_MINUTES,
        );
        let cooldown_minutes = get_env_number("REMINDER_COOLDOWN_MINUTES", detection_window_minutes);

        let dry_run = std::env::var("DRY_RUN")
            .map(|v| is_truthy(&v))
            .unwrap_or(false);

        let openai = std::env::var("OPENAI_API_KEY").ok().map(|api_key| {
            let model =
                std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
            OpenAiConfig { api_key, model }
        });

        let twilio = match (
            std::env::var("TWILIO_ACCOUNT_SID"),
            std::env::var("TWILIO_AUTH_TOKEN"),
            std::env::var("TWILIO_FROM_NUMBER"),
        ) {
            (Ok(account_sid), Ok(auth_token), Ok(from_number)) => Some(TwilioConfig {
                account_sid,
                auth_token,
                from_number,
            }),
            _ => None,
        };

        Self {
            port,
            detection_window_minutes,
            cooldown_minutes,
            scan_interval_minutes: get_env_number(
                "SCAN_INTERVAL_MINUTES",
                DEFAULT_SCAN_INTERVAL_MINUTES,
            ),
            checkout_base_url: std::env::var("CHECKOUT_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_CHECKOUT_BASE_URL.into()),
            dry_run,
            pacing_delay_millis: get_env_number(
                "PACING_DELAY_MILLIS",
                DEFAULT_PACING_DELAY_MILLIS,
            ),
            openai,
            twilio,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn get_env_number<T>(name: &str, default: T) -> T
where
    T: FromStr + Display + Copy,
{
    match std::env::var(name) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    name, raw, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes")
}
