use abona_domain::Subscription;
use chrono::NaiveDate;

/// Renders the owner-facing text for a subscription approaching its end
/// date. Dates are formatted day-first as owners expect them.
pub fn expiring_subscription_text(
    client_name: &str,
    subscription: &Subscription,
    today: NaiveDate,
) -> String {
    let end_date = subscription.end_date.format("%d.%m.%Y");
    match (subscription.end_date - today).num_days() {
        d if d <= 0 => format!(
            "Subscription of {} expires today ({})",
            client_name, end_date
        ),
        1 => format!(
            "Subscription of {} expires tomorrow ({})",
            client_name, end_date
        ),
        d => format!(
            "Subscription of {} expires in {} days ({})",
            client_name, d, end_date
        ),
    }
}
