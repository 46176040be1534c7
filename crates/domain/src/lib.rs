mod business;
mod client;
mod owner;
mod shared;
mod subscription;

pub use business::Business;
pub use client::{normalize_phone, Client};
pub use owner::{OwnerProfile, ReminderSettings};
pub use shared::entity::{Entity, ID};
pub use subscription::{Subscription, SubscriptionStatus, TransitionError};
