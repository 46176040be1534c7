use crate::shared::entity::{Entity, ID};

/// A `Client` is an end customer of a `Business` holding subscriptions.
#[derive(Debug, Clone)]
pub struct Client {
    pub id: ID,
    pub business_id: ID,
    pub full_name: String,
    pub phone: String,
}

impl Client {
    pub fn new(business_id: ID, full_name: String, phone: String) -> Self {
        Self {
            id: Default::default(),
            business_id,
            full_name,
            phone,
        }
    }
}

impl Entity for Client {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// Basic phone normalization and validation.
///
/// Accepts 7 to 15 digits with an optional leading '+', ignoring spaces and
/// dashes. Returns the normalized phone or `None` if the value looks invalid.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    if !(7..=15).contains(&digits.len()) {
        return None;
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(cleaned)
}
