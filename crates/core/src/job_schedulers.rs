use crate::reminder::SendScheduledRemindersUseCase;
use crate::shared::usecase::execute;
use abona_infra::AbonaContext;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

const HOUR_MILLIS: i64 = 1000 * 60 * 60;

/// Millis to wait so the next sweep lands on the top of an hour. Owner
/// hours are matched per sweep, so alignment keeps deliveries close to the
/// configured local hour.
fn millis_until_next_hour(now_millis: i64) -> i64 {
    (HOUR_MILLIS - now_millis % HOUR_MILLIS) % HOUR_MILLIS
}

/// Background driver of the hourly reminder sweep.
///
/// `start` is idempotent while a sweep loop is running, and `stop` lets an
/// in-flight sweep drain within a configured grace period before the task
/// is aborted.
pub struct ReminderJobScheduler {
    ctx: AbonaContext,
    shutdown: watch::Sender<bool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl ReminderJobScheduler {
    pub fn new(ctx: AbonaContext) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            ctx,
            shutdown,
            handle: Mutex::new(None),
        }
    }

    pub fn start(&self) {
        let mut handle = self.handle.lock().unwrap();
        if handle.is_some() {
            warn!("Reminder job scheduler is already running");
            return;
        }
        let _ = self.shutdown.send(false);
        let mut shutdown = self.shutdown.subscribe();
        let ctx = self.ctx.clone();

        *handle = Some(tokio::spawn(async move {
            let delay = millis_until_next_hour(ctx.sys.get_timestamp_millis());
            info!(
                "Reminder job scheduler started, first sweep in {} millis",
                delay
            );
            tokio::select! {
                biased;
                _ = shutdown.changed() => return,
                _ = tokio::time::sleep(Duration::from_millis(delay as u64)) => {}
            }

            let mut interval = tokio::time::interval(Duration::from_millis(HOUR_MILLIS as u64));
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown.changed() => return,
                    _ = interval.tick() => {
                        if let Err(e) = execute(SendScheduledRemindersUseCase, &ctx).await {
                            error!("Scheduled reminder sweep failed: {:?}", e);
                        }
                    }
                }
            }
        }));
    }

    pub async fn stop(&self) {
        let handle = { self.handle.lock().unwrap().take() };
        let mut handle = match handle {
            Some(handle) => handle,
            None => {
                warn!("Reminder job scheduler is not running");
                return;
            }
        };

        let _ = self.shutdown.send(true);
        let grace = Duration::from_millis(self.ctx.config.scheduler_shutdown_grace_millis);
        match tokio::time::timeout(grace, &mut handle).await {
            Ok(_) => info!("Reminder job scheduler stopped"),
            Err(_) => {
                handle.abort();
                warn!(
                    "Reminder job scheduler did not drain within {:?}, aborting",
                    grace
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_computes_delay_until_next_hour() {
        assert_eq!(millis_until_next_hour(0), 0);
        assert_eq!(millis_until_next_hour(1), HOUR_MILLIS - 1);
        assert_eq!(millis_until_next_hour(HOUR_MILLIS), 0);
        assert_eq!(millis_until_next_hour(HOUR_MILLIS + 30 * 60 * 1000), 30 * 60 * 1000);
        assert_eq!(millis_until_next_hour(3 * HOUR_MILLIS - 1), 1);
    }

    #[tokio::test]
    async fn start_is_idempotent_and_stop_drains() {
        let scheduler = ReminderJobScheduler::new(AbonaContext::create_inmemory());
        scheduler.start();
        // Second start must not spawn a second loop
        scheduler.start();
        scheduler.stop().await;
        assert!(scheduler.handle.lock().unwrap().is_none());
        // Stopping again is a no-op
        scheduler.stop().await;
    }

    #[tokio::test]
    async fn scheduler_can_be_restarted() {
        let scheduler = ReminderJobScheduler::new(AbonaContext::create_inmemory());
        scheduler.start();
        scheduler.stop().await;
        scheduler.start();
        assert!(scheduler.handle.lock().unwrap().is_some());
        scheduler.stop().await;
    }
}
