mod create_subscription;
mod renew_subscription;
mod update_subscription_status;

pub use create_subscription::CreateSubscriptionUseCase;
pub use renew_subscription::RenewSubscriptionUseCase;
pub use update_subscription_status::{StatusAction, UpdateSubscriptionStatusUseCase};
