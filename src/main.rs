mod telemetry;

use abona_core::ReminderJobScheduler;
use abona_infra::setup_context;
use telemetry::{get_subscriber, init_subscriber};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("abona".into(), "info".into());
    init_subscriber(subscriber);

    let context = setup_context().await;

    let scheduler = ReminderJobScheduler::new(context);
    scheduler.start();

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");
    scheduler.stop().await;

    Ok(())
}
