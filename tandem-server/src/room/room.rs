use crate::error::SignalingError;
use tandem_core::{ConnectionId, Role, RoomId};
use tokio::time::Instant;

pub const ROOM_CAPACITY: usize = 2;

/// A two-seat room. Join order decides roles: the first seat initiates.
#[derive(Debug)]
pub struct Room {
    id: RoomId,
    members: Vec<ConnectionId>,
    created_at: Instant,
    /// Set once the room has emptied and been dropped from the registry.
    /// A handle cloned before removal must not admit anyone afterwards.
    retired: bool,
}

impl Room {
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            members: Vec::with_capacity(ROOM_CAPACITY),
            created_at: Instant::now(),
            retired: false,
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn members(&self) -> &[ConnectionId] {
        &self.members
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= ROOM_CAPACITY
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.members.contains(id)
    }

    pub fn role_of(&self, id: &ConnectionId) -> Role {
        self.members
            .iter()
            .position(|m| m == id)
            .map(Role::for_position)
            .unwrap_or(Role::Unassigned)
    }

    pub fn peer_of(&self, id: &ConnectionId) -> Option<ConnectionId> {
        if !self.contains(id) {
            return None;
        }
        self.members.iter().copied().find(|m| m != id)
    }

    pub(crate) fn is_retired(&self) -> bool {
        self.retired
    }

    pub(crate) fn retire(&mut self) {
        self.retired = true;
    }

    /// Seat a connection and return the role it got.
    pub(crate) fn admit(&mut self, id: ConnectionId) -> Result<Role, SignalingError> {
        if self.is_full() {
            return Err(SignalingError::RoomFull(self.id.clone()));
        }
        if !self.contains(&id) {
            self.members.push(id);
        }
        Ok(self.role_of(&id))
    }

    /// Remove a member. `None` if it was not seated here; otherwise the
    /// member still left in the room, if any.
    pub(crate) fn evict(&mut self, id: &ConnectionId) -> Option<Option<ConnectionId>> {
        let pos = self.members.iter().position(|m| m == id)?;
        self.members.remove(pos);
        Some(self.members.first().copied())
    }
}
