use serde::{Deserialize, Serialize};

/// Negotiation role inside a room. The first member initiates.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, Hash, Eq, PartialEq)]
pub enum Role {
    #[default]
    Unassigned,
    Initiator,
    Responder,
}

impl Role {
    /// Role implied by a member's position in the room's join order.
    pub fn for_position(index: usize) -> Self {
        match index {
            0 => Role::Initiator,
            _ => Role::Responder,
        }
    }
}
