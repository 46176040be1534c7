use serde::Serialize;
use tracing::error;

/// Outbound channel for owner-facing notifications. The scheduler only
/// learns whether a delivery succeeded, never how it was transported.
#[async_trait::async_trait]
pub trait INotificationGateway: Send + Sync {
    async fn send(&self, external_user_id: i64, text: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Serialize)]
struct SendMessageBody<'a> {
    chat_id: i64,
    text: &'a str,
}

pub struct TelegramNotificationGateway {
    client: reqwest::Client,
    api_base: String,
}

impl TelegramNotificationGateway {
    pub fn new(bot_token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: format!("https://api.telegram.org/bot{}", bot_token),
        }
    }
}

#[async_trait::async_trait]
impl INotificationGateway for TelegramNotificationGateway {
    async fn send(&self, external_user_id: i64, text: &str) -> anyhow::Result<()> {
        let res = self
            .client
            .post(&format!("{}/sendMessage", self.api_base))
            .json(&SendMessageBody {
                chat_id: external_user_id,
                text,
            })
            .send()
            .await
            .map_err(|e| {
                error!(
                    "Notification delivery to user: {} failed. Error: {:?}",
                    external_user_id, e
                );
                e
            })?;
        if !res.status().is_success() {
            error!(
                "Notification delivery to user: {} rejected with status: {}",
                external_user_id,
                res.status()
            );
            return Err(anyhow::anyhow!(
                "Notification API rejected request with status: {}",
                res.status()
            ));
        }
        Ok(())
    }
}

/// Records sent messages instead of delivering them. `fail_next_sends`
/// arranges for the next n sends to error, for exercising retry paths.
pub struct InMemoryNotificationGateway {
    sent: std::sync::Mutex<Vec<(i64, String)>>,
    fail_next: std::sync::Mutex<usize>,
}

impl InMemoryNotificationGateway {
    pub fn new() -> Self {
        Self {
            sent: std::sync::Mutex::new(Vec::new()),
            fail_next: std::sync::Mutex::new(0),
        }
    }

    pub fn fail_next_sends(&self, count: usize) {
        *self.fail_next.lock().unwrap() = count;
    }

    pub fn sent_messages(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemoryNotificationGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl INotificationGateway for InMemoryNotificationGateway {
    async fn send(&self, external_user_id: i64, text: &str) -> anyhow::Result<()> {
        let mut fail_next = self.fail_next.lock().unwrap();
        if *fail_next > 0 {
            *fail_next -= 1;
            return Err(anyhow::anyhow!("Simulated delivery failure"));
        }
        drop(fail_next);
        self.sent
            .lock()
            .unwrap()
            .push((external_user_id, text.to_string()));
        Ok(())
    }
}
