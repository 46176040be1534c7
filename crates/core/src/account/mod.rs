mod resolve_owner_context;
mod update_reminder_settings;

pub use resolve_owner_context::ResolveOwnerContextUseCase;
pub use update_reminder_settings::UpdateReminderSettingsUseCase;
