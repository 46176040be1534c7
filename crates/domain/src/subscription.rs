use crate::shared::entity::{Entity, ID};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    Cancelled,
    Frozen,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
            Self::Frozen => "frozen",
        }
    }
}

impl Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Subscription status: {0} is not valid")]
pub struct InvalidStatusError(String);

impl FromStr for SubscriptionStatus {
    type Err = InvalidStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "expired" => Ok(Self::Expired),
            "cancelled" => Ok(Self::Cancelled),
            "frozen" => Ok(Self::Frozen),
            _ => Err(InvalidStatusError(s.to_string())),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum TransitionError {
    #[error("Subscription cannot transition from {from} to {to}")]
    NotAllowed {
        from: SubscriptionStatus,
        to: SubscriptionStatus,
    },
    #[error("Subscription can only be renewed by a positive number of days, got: {0}")]
    InvalidRenewal(i64),
}

/// A `Subscription` ties a `Client` to a `Business` for a period of time.
///
/// `reminder_sent_at` is the bookkeeping flag of the scheduled reminder path:
/// non-null only if a reminder was dispatched for the current expiration
/// cycle, and cleared by `renew` so the next cycle is independently eligible.
#[derive(Debug, Clone)]
pub struct Subscription {
    pub id: ID,
    pub business_id: ID,
    pub client_id: ID,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: SubscriptionStatus,
    /// Millis timestamp of the successful reminder dispatch for this cycle
    pub reminder_sent_at: Option<i64>,
}

impl Subscription {
    pub fn new(business_id: ID, client_id: ID, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: Default::default(),
            business_id,
            client_id,
            start_date,
            end_date,
            status: SubscriptionStatus::Active,
            reminder_sent_at: None,
        }
    }

    pub fn cancel(&mut self) -> Result<(), TransitionError> {
        self.transition_from_active(SubscriptionStatus::Cancelled)
    }

    pub fn freeze(&mut self) -> Result<(), TransitionError> {
        self.transition_from_active(SubscriptionStatus::Frozen)
    }

    pub fn resume(&mut self) -> Result<(), TransitionError> {
        if self.status != SubscriptionStatus::Frozen {
            return Err(TransitionError::NotAllowed {
                from: self.status,
                to: SubscriptionStatus::Active,
            });
        }
        self.status = SubscriptionStatus::Active;
        Ok(())
    }

    /// Extends the end date and re-arms the reminder cycle. Allowed from any
    /// status except `Cancelled`; the resulting status is always `Active`.
    pub fn renew(&mut self, additional_days: i64) -> Result<(), TransitionError> {
        if additional_days <= 0 {
            return Err(TransitionError::InvalidRenewal(additional_days));
        }
        if self.status == SubscriptionStatus::Cancelled {
            return Err(TransitionError::NotAllowed {
                from: self.status,
                to: SubscriptionStatus::Active,
            });
        }
        self.end_date = self.end_date + Duration::days(additional_days);
        self.status = SubscriptionStatus::Active;
        self.reminder_sent_at = None;
        Ok(())
    }

    /// `Expired` is never written eagerly, it is derived from the end date
    /// wherever the status is read or reported.
    pub fn status_on(&self, today: NaiveDate) -> SubscriptionStatus {
        if self.status == SubscriptionStatus::Active && self.end_date < today {
            SubscriptionStatus::Expired
        } else {
            self.status
        }
    }

    pub fn days_until_expiry(&self, today: NaiveDate) -> i64 {
        (self.end_date - today).num_days()
    }

    /// Whether this subscription qualifies for a reminder with the given
    /// horizon: active, expiring within `days_until` days and, for the
    /// scheduled path, not yet reminded this cycle.
    pub fn is_reminder_candidate(
        &self,
        today: NaiveDate,
        days_until: i64,
        require_not_yet_reminded: bool,
    ) -> bool {
        if self.status != SubscriptionStatus::Active {
            return false;
        }
        if require_not_yet_reminded && self.reminder_sent_at.is_some() {
            return false;
        }
        (0..=days_until).contains(&self.days_until_expiry(today))
    }

    fn transition_from_active(&mut self, to: SubscriptionStatus) -> Result<(), TransitionError> {
        if self.status != SubscriptionStatus::Active {
            return Err(TransitionError::NotAllowed {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

impl Entity for Subscription {
    fn id(&self) -> &ID {
        &self.id
    }
}
