use crate::shared::entity::{Entity, ID};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// An `OwnerProfile` is the tenant root: one business operator, uniquely
/// identified by an external chat user id, owning a `Business` and its
/// reminder preferences.
#[derive(Debug, Clone)]
pub struct OwnerProfile {
    pub id: ID,
    /// Unique external identity (Telegram user id) this profile is keyed on
    pub external_user_id: i64,
    pub full_name: Option<String>,
    pub settings: ReminderSettings,
}

/// Per-owner preferences for the scheduled reminder sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderSettings {
    pub enabled: bool,
    /// Local hour of day [0, 23] at which reminders should be delivered
    pub hour: u32,
    /// How many days before expiration a subscription becomes remindable [1, 30]
    pub days_before: i64,
    pub timezone: Tz,
}

impl ReminderSettings {
    pub fn set_hour(&mut self, hour: u32) -> bool {
        if hour > 23 {
            return false;
        }
        self.hour = hour;
        true
    }

    pub fn set_days_before(&mut self, days_before: i64) -> bool {
        if !(1..=30).contains(&days_before) {
            return false;
        }
        self.days_before = days_before;
        true
    }

    pub fn set_timezone(&mut self, timezone: &str) -> bool {
        match timezone.parse::<Tz>() {
            Ok(tz) => {
                self.timezone = tz;
                true
            }
            Err(_) => false,
        }
    }
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            hour: 10,
            days_before: 7,
            timezone: chrono_tz::Europe::Moscow,
        }
    }
}

impl OwnerProfile {
    pub fn new(external_user_id: i64, full_name: Option<String>) -> Self {
        Self {
            id: Default::default(),
            external_user_id,
            full_name,
            settings: Default::default(),
        }
    }
}

impl Entity for OwnerProfile {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_creates_owner_with_default_settings() {
        let owner = OwnerProfile::new(42, Some("Anna".into()));
        assert!(owner.settings.enabled);
        assert_eq!(owner.settings.hour, 10);
        assert_eq!(owner.settings.days_before, 7);
        assert_eq!(owner.settings.timezone, chrono_tz::Europe::Moscow);
    }

    #[test]
    fn it_validates_reminder_hour() {
        let mut settings = ReminderSettings::default();
        assert!(settings.set_hour(0));
        assert!(settings.set_hour(23));
        assert!(!settings.set_hour(24));
        // Last valid value is preserved
        assert_eq!(settings.hour, 23);
    }

    #[test]
    fn it_validates_reminder_days_before() {
        let mut settings = ReminderSettings::default();
        assert!(settings.set_days_before(1));
        assert!(settings.set_days_before(30));
        assert!(!settings.set_days_before(0));
        assert!(!settings.set_days_before(31));
        assert_eq!(settings.days_before, 30);
    }

    #[test]
    fn it_validates_timezone() {
        let mut settings = ReminderSettings::default();
        assert!(settings.set_timezone("UTC"));
        assert_eq!(settings.timezone, chrono_tz::UTC);
        assert!(!settings.set_timezone("Not/AZone"));
        assert_eq!(settings.timezone, chrono_tz::UTC);
    }
}
