use crate::shared::entity::{Entity, ID};

/// A `Business` scopes all clients and subscriptions belonging to one
/// `OwnerProfile`. Exactly one is provisioned per owner at first contact,
/// but nothing in the model prevents an owner from holding several.
#[derive(Debug, Clone)]
pub struct Business {
    pub id: ID,
    pub owner_id: ID,
    pub name: String,
}

impl Business {
    pub fn new(owner_id: ID, name: String) -> Self {
        Self {
            id: Default::default(),
            owner_id,
            name,
        }
    }
}

impl Entity for Business {
    fn id(&self) -> &ID {
        &self.id
    }
}
