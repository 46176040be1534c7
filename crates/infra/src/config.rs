use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    /// Token for the Telegram notification gateway. Optional so that tests
    /// and tooling can build a context without it.
    pub telegram_bot_token: Option<String>,
    /// Maximum number of owners dispatched concurrently within one sweep.
    /// Unbounded fan-out would overwhelm the notification gateway.
    pub reminder_sweep_concurrency: usize,
    /// How many delivery attempts a single reminder gets within one tick
    pub gateway_send_retries: u32,
    /// Base backoff between delivery attempts, multiplied by the attempt number
    pub gateway_retry_backoff_millis: u64,
    /// How long `stop` waits for an in-flight sweep before abandoning it
    pub scheduler_shutdown_grace_millis: u64,
}

impl Config {
    pub fn new() -> Self {
        Self {
            telegram_bot_token: std::env::var("TELEGRAM_BOT_TOKEN").ok(),
            reminder_sweep_concurrency: parse_env_or("REMINDER_SWEEP_CONCURRENCY", 10),
            gateway_send_retries: parse_env_or("GATEWAY_SEND_RETRIES", 3),
            gateway_retry_backoff_millis: parse_env_or("GATEWAY_RETRY_BACKOFF_MILLIS", 500),
            scheduler_shutdown_grace_millis: parse_env_or(
                "SCHEDULER_SHUTDOWN_GRACE_MILLIS",
                10 * 1000,
            ),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_env_or<T: FromStr + Display>(key: &str, default: T) -> T {
    let value = match std::env::var(key) {
        Ok(value) => value,
        Err(_) => return default,
    };
    match value.parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(
                "The given {}: {} is not valid, falling back to the default: {}.",
                key, value, default
            );
            default
        }
    }
}
