use crate::reminder::message::expiring_subscription_text;
use crate::shared::usecase::UseCase;
use abona_domain::{OwnerProfile, Subscription};
use abona_infra::AbonaContext;
use chrono::{NaiveDate, Timelike};
use futures::StreamExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{info, warn};

/// One hourly sweep over all reminder-enabled owners.
///
/// Each owner is matched against the sweep hour in their own timezone, and
/// every eligible subscription is claimed before its reminder is delivered.
/// The claim is a conditional write on `reminder_sent_at`, so when several
/// instances sweep at once each reminder still goes out exactly once. A
/// failed delivery releases the claim for the next sweep to retry.
#[derive(Debug)]
pub struct SendScheduledRemindersUseCase;

#[derive(Debug, PartialEq)]
pub struct SweepReport {
    pub owners_considered: usize,
    pub owners_matched: usize,
    pub sent: usize,
    pub failed: usize,
    pub skipped_already_claimed: usize,
}

#[derive(Default)]
struct SweepCounters {
    owners_matched: AtomicUsize,
    sent: AtomicUsize,
    failed: AtomicUsize,
    skipped_already_claimed: AtomicUsize,
}

#[async_trait::async_trait]
impl UseCase for SendScheduledRemindersUseCase {
    type Response = SweepReport;
    type Error = anyhow::Error;

    const NAME: &'static str = "SendScheduledReminders";

    async fn execute(&mut self, ctx: &AbonaContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_utc_datetime();
        let owners = ctx.repos.owners.find_reminder_enabled().await?;
        let owners_considered = owners.len();
        let counters = SweepCounters::default();

        futures::stream::iter(owners)
            .for_each_concurrent(ctx.config.reminder_sweep_concurrency, |owner| {
                let counters = &counters;
                async move {
                    let local_now = now.with_timezone(&owner.settings.timezone);
                    if local_now.hour() != owner.settings.hour {
                        return;
                    }
                    counters.owners_matched.fetch_add(1, Ordering::Relaxed);

                    let today = local_now.date_naive();
                    if let Err(e) = remind_owner(&owner, today, ctx, counters).await {
                        warn!(
                            "Reminder sweep for owner: {} failed. Error: {:?}",
                            owner.id, e
                        );
                    }
                }
            })
            .await;

        let report = SweepReport {
            owners_considered,
            owners_matched: counters.owners_matched.load(Ordering::Relaxed),
            sent: counters.sent.load(Ordering::Relaxed),
            failed: counters.failed.load(Ordering::Relaxed),
            skipped_already_claimed: counters.skipped_already_claimed.load(Ordering::Relaxed),
        };
        info!("Reminder sweep finished: {:?}", report);
        Ok(report)
    }
}

async fn remind_owner(
    owner: &OwnerProfile,
    today: NaiveDate,
    ctx: &AbonaContext,
    counters: &SweepCounters,
) -> anyhow::Result<()> {
    let businesses = ctx.repos.businesses.list_by_owner_id(&owner.id).await?;
    for business in businesses {
        let candidates = ctx
            .repos
            .subscriptions
            .find_reminder_candidates(&business.id, today, owner.settings.days_before, true)
            .await?;
        for subscription in candidates {
            dispatch_with_claim(owner, &subscription, today, ctx, counters).await?;
        }
    }
    Ok(())
}

async fn dispatch_with_claim(
    owner: &OwnerProfile,
    subscription: &Subscription,
    today: NaiveDate,
    ctx: &AbonaContext,
    counters: &SweepCounters,
) -> anyhow::Result<()> {
    let sent_at = ctx.sys.get_timestamp_millis();
    if !ctx
        .repos
        .subscriptions
        .claim_reminder_slot(&subscription.id, sent_at)
        .await?
    {
        // Another instance got here first for this cycle
        counters
            .skipped_already_claimed
            .fetch_add(1, Ordering::Relaxed);
        return Ok(());
    }

    let client_name = match ctx.repos.clients.find(&subscription.client_id).await {
        Some(client) => client.full_name,
        None => "Unknown".to_string(),
    };
    let text = expiring_subscription_text(&client_name, subscription, today);

    match deliver_with_retries(owner.external_user_id, &text, ctx).await {
        Ok(_) => {
            counters.sent.fetch_add(1, Ordering::Relaxed);
        }
        Err(e) => {
            warn!(
                "Reminder delivery for subscription: {} failed, releasing claim. Error: {:?}",
                subscription.id, e
            );
            ctx.repos
                .subscriptions
                .release_reminder_slot(&subscription.id)
                .await?;
            counters.failed.fetch_add(1, Ordering::Relaxed);
        }
    }
    Ok(())
}

async fn deliver_with_retries(
    external_user_id: i64,
    text: &str,
    ctx: &AbonaContext,
) -> anyhow::Result<()> {
    let retries = ctx.config.gateway_send_retries.max(1);
    let mut last_err = None;
    for attempt in 1..=retries {
        match ctx.notification_gateway.send(external_user_id, text).await {
            Ok(_) => return Ok(()),
            Err(e) => {
                last_err = Some(e);
                if attempt < retries {
                    let backoff = ctx.config.gateway_retry_backoff_millis * attempt as u64;
                    tokio::time::sleep(std::time::Duration::from_millis(backoff)).await;
                }
            }
        }
    }
    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Delivery failed")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use abona_domain::{Business, Client, Subscription};
    use abona_infra::{ISubscriptionRepo, ISys, InMemoryNotificationGateway};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    struct StaticTimeSys {
        millis: i64,
    }

    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.millis
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn utc_millis(y: i32, m: u32, d: u32, hour: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, hour, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    struct TestWorld {
        ctx: AbonaContext,
        gateway: Arc<InMemoryNotificationGateway>,
        owner: abona_domain::OwnerProfile,
        subscription: Subscription,
    }

    /// One UTC owner at the default hour 10 / 7 days window, with a single
    /// client whose subscription ends on 2026-09-08.
    async fn seed_world() -> TestWorld {
        let mut ctx = AbonaContext::create_inmemory();
        let gateway = Arc::new(InMemoryNotificationGateway::new());
        ctx.notification_gateway = gateway.clone();
        ctx.config.gateway_retry_backoff_millis = 1;

        let mut owner = abona_domain::OwnerProfile::new(42, Some("Anna".into()));
        assert!(owner.settings.set_timezone("UTC"));
        ctx.repos.owners.insert(&owner).await.unwrap();

        let business = Business::new(owner.id.clone(), "Studio".into());
        ctx.repos.businesses.insert(&business).await.unwrap();
        let client = Client::new(business.id.clone(), "Ivan".into(), "+79150000000".into());
        ctx.repos.clients.insert(&client).await.unwrap();

        let subscription = Subscription::new(
            business.id.clone(),
            client.id.clone(),
            date(2026, 8, 9),
            date(2026, 9, 8),
        );
        ctx.repos.subscriptions.insert(&subscription).await.unwrap();

        TestWorld {
            ctx,
            gateway,
            owner,
            subscription,
        }
    }

    async fn sweep_at(world: &mut TestWorld, millis: i64) -> SweepReport {
        world.ctx.sys = Arc::new(StaticTimeSys { millis });
        execute(SendScheduledRemindersUseCase, &world.ctx)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn sends_once_at_matching_hour_within_window() {
        let mut world = seed_world().await;

        // 7 days before expiry at the owner's hour
        let report = sweep_at(&mut world, utc_millis(2026, 9, 1, 10)).await;
        assert_eq!(report.owners_matched, 1);
        assert_eq!(report.sent, 1);

        let messages = world.gateway.sent_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, 42);
        assert!(messages[0].1.contains("Ivan"));

        let stored = world
            .ctx
            .repos
            .subscriptions
            .find(&world.subscription.id)
            .await
            .unwrap();
        assert_eq!(stored.reminder_sent_at, Some(utc_millis(2026, 9, 1, 10)));

        // Re-running the same hour is a no-op: the set flag already
        // filters the subscription out of the candidate query
        let report = sweep_at(&mut world, utc_millis(2026, 9, 1, 10)).await;
        assert_eq!(report.sent, 0);
        assert_eq!(report.skipped_already_claimed, 0);
        assert_eq!(world.gateway.sent_messages().len(), 1);
    }

    #[tokio::test]
    async fn skips_owner_outside_their_hour() {
        let mut world = seed_world().await;

        let report = sweep_at(&mut world, utc_millis(2026, 9, 1, 11)).await;
        assert_eq!(report.owners_considered, 1);
        assert_eq!(report.owners_matched, 0);
        assert!(world.gateway.sent_messages().is_empty());
    }

    #[tokio::test]
    async fn skips_subscription_outside_window() {
        let mut world = seed_world().await;

        // 8 days before expiry is outside the 7 day window
        let report = sweep_at(&mut world, utc_millis(2026, 8, 31, 10)).await;
        assert_eq!(report.owners_matched, 1);
        assert_eq!(report.sent, 0);
    }

    #[tokio::test]
    async fn disabled_owner_is_never_swept() {
        let mut world = seed_world().await;
        world.owner.settings.enabled = false;
        world.ctx.repos.owners.save(&world.owner).await.unwrap();

        let report = sweep_at(&mut world, utc_millis(2026, 9, 1, 10)).await;
        assert_eq!(report.owners_considered, 0);
        assert!(world.gateway.sent_messages().is_empty());
    }

    #[tokio::test]
    async fn renewed_subscription_leaves_the_window() {
        let mut world = seed_world().await;
        let mut sub = world.subscription.clone();
        sub.renew(30).unwrap();
        world.ctx.repos.subscriptions.save(&sub).await.unwrap();

        let report = sweep_at(&mut world, utc_millis(2026, 9, 1, 10)).await;
        assert_eq!(report.sent, 0);
    }

    #[tokio::test]
    async fn failed_delivery_releases_the_claim() {
        let mut world = seed_world().await;
        // Exhaust every retry of the first dispatch
        world
            .gateway
            .fail_next_sends(world.ctx.config.gateway_send_retries as usize);

        let report = sweep_at(&mut world, utc_millis(2026, 9, 1, 10)).await;
        assert_eq!(report.failed, 1);
        assert_eq!(report.sent, 0);

        let stored = world
            .ctx
            .repos
            .subscriptions
            .find(&world.subscription.id)
            .await
            .unwrap();
        assert_eq!(stored.reminder_sent_at, None);

        // The next sweep picks the subscription up again
        let report = sweep_at(&mut world, utc_millis(2026, 9, 1, 10)).await;
        assert_eq!(report.sent, 1);
        assert_eq!(world.gateway.sent_messages().len(), 1);
    }

    /// Serves candidate snapshots from before another instance claimed the
    /// slot, the way a racing sweeper sees them between query and claim.
    struct StaleReadSubscriptionRepo {
        inner: Arc<dyn ISubscriptionRepo>,
    }

    #[async_trait::async_trait]
    impl ISubscriptionRepo for StaleReadSubscriptionRepo {
        async fn insert(&self, subscription: &Subscription) -> anyhow::Result<()> {
            self.inner.insert(subscription).await
        }

        async fn save(&self, subscription: &Subscription) -> anyhow::Result<()> {
            self.inner.save(subscription).await
        }

        async fn find(&self, subscription_id: &abona_domain::ID) -> Option<Subscription> {
            self.inner.find(subscription_id).await
        }

        async fn list_by_business_id(
            &self,
            business_id: &abona_domain::ID,
        ) -> anyhow::Result<Vec<Subscription>> {
            self.inner.list_by_business_id(business_id).await
        }

        async fn find_reminder_candidates(
            &self,
            business_id: &abona_domain::ID,
            today: NaiveDate,
            days_until: i64,
            _require_not_yet_reminded: bool,
        ) -> anyhow::Result<Vec<Subscription>> {
            self.inner
                .find_reminder_candidates(business_id, today, days_until, false)
                .await
        }

        async fn claim_reminder_slot(
            &self,
            subscription_id: &abona_domain::ID,
            sent_at: i64,
        ) -> anyhow::Result<bool> {
            self.inner.claim_reminder_slot(subscription_id, sent_at).await
        }

        async fn release_reminder_slot(
            &self,
            subscription_id: &abona_domain::ID,
        ) -> anyhow::Result<()> {
            self.inner.release_reminder_slot(subscription_id).await
        }
    }

    #[tokio::test]
    async fn lost_claim_is_a_benign_skip() {
        let mut world = seed_world().await;
        world.ctx.repos.subscriptions = Arc::new(StaleReadSubscriptionRepo {
            inner: world.ctx.repos.subscriptions.clone(),
        });
        // Another instance claimed this cycle after our candidate query
        assert!(world
            .ctx
            .repos
            .subscriptions
            .claim_reminder_slot(&world.subscription.id, 999)
            .await
            .unwrap());

        let report = sweep_at(&mut world, utc_millis(2026, 9, 1, 10)).await;
        assert_eq!(report.skipped_already_claimed, 1);
        assert_eq!(report.sent, 0);
        assert_eq!(report.failed, 0);
        assert!(world.gateway.sent_messages().is_empty());

        // The other instance's claim is left in place
        let stored = world
            .ctx
            .repos
            .subscriptions
            .find(&world.subscription.id)
            .await
            .unwrap();
        assert_eq!(stored.reminder_sent_at, Some(999));
    }

    #[tokio::test]
    async fn owner_hour_is_matched_in_their_timezone() {
        let mut world = seed_world().await;
        // Moscow is UTC+3, so local hour 10 is 07:00 UTC
        assert!(world.owner.settings.set_timezone("Europe/Moscow"));
        world.ctx.repos.owners.save(&world.owner).await.unwrap();

        let report = sweep_at(&mut world, utc_millis(2026, 9, 1, 10)).await;
        assert_eq!(report.owners_matched, 0);

        let report = sweep_at(&mut world, utc_millis(2026, 9, 1, 7)).await;
        assert_eq!(report.owners_matched, 1);
        assert_eq!(report.sent, 1);
    }
}
