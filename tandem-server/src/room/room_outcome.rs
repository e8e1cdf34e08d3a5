use serde::Serialize;
use tandem_core::{ConnectionId, RoomId};

/// Result of a successful join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// First seat in a new room.
    Created,
    /// Second seat; `Ready` was sent to both members.
    Joined { peer: ConnectionId },
    /// Already seated in the requested room; nothing changed.
    AlreadySeated,
}

/// What a leave actually removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room: RoomId,
    /// The member that got `PeerLeft`, if the room was not emptied.
    pub notified: Option<ConnectionId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomSummary {
    pub room: RoomId,
    pub members: usize,
    pub age_secs: u64,
}
