mod message;
mod send_business_reminders;
mod send_scheduled_reminders;

pub use message::expiring_subscription_text;
pub use send_business_reminders::SendBusinessRemindersUseCase;
pub use send_scheduled_reminders::{SendScheduledRemindersUseCase, SweepReport};
