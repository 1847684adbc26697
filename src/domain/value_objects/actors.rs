use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::enums::actor_roles::ActorRole;

/// The authenticated caller, as resolved by the auth layer. The settlement
/// core treats this as an opaque input: it never inspects session mechanics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: ActorRole,
}

impl Actor {
    pub fn new(id: Uuid, role: ActorRole) -> Self {
        Self { id, role }
    }

    /// Internal actor used by system-triggered jobs such as the payout sweep.
    pub fn system() -> Self {
        Self {
            id: Uuid::nil(),
            role: ActorRole::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ActorRole::Admin
    }
}
