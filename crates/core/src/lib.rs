mod account;
mod client;
mod job_schedulers;
mod reminder;
mod shared;
mod subscription;

pub use account::{ResolveOwnerContextUseCase, UpdateReminderSettingsUseCase};
pub use client::CreateClientUseCase;
pub use job_schedulers::ReminderJobScheduler;
pub use reminder::{
    expiring_subscription_text, SendBusinessRemindersUseCase, SendScheduledRemindersUseCase,
    SweepReport,
};
pub use shared::usecase::{execute, UseCase};
pub use subscription::{
    CreateSubscriptionUseCase, RenewSubscriptionUseCase, StatusAction,
    UpdateSubscriptionStatusUseCase,
};
