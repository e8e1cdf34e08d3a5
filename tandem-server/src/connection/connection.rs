use tandem_core::{ConnectionId, MediaState, Role, RoomId, SignalMessage};
use tokio::time::Instant;

/// Server-side record of one attached endpoint.
///
/// A connection points at its room by id only; the room registry owns rooms.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    room: Option<RoomId>,
    role: Role,
    media: MediaState,
    attached_at: Instant,
}

impl Connection {
    pub fn new(id: ConnectionId) -> Self {
        Self {
            id,
            room: None,
            role: Role::Unassigned,
            media: MediaState::default(),
            attached_at: Instant::now(),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn room(&self) -> Option<&RoomId> {
        self.room.as_ref()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn media(&self) -> MediaState {
        self.media
    }

    pub fn attached_at(&self) -> Instant {
        self.attached_at
    }

    pub(crate) fn enter(&mut self, room: RoomId, role: Role) {
        self.room = Some(room);
        self.role = role;
    }

    /// The peer left; a lone member always initiates the next negotiation.
    pub(crate) fn promote(&mut self) {
        self.role = Role::Initiator;
    }

    pub(crate) fn vacate(&mut self) {
        self.room = None;
        self.role = Role::Unassigned;
    }

    /// Record a media toggle. Returns false for frames that carry no media state.
    pub(crate) fn apply_media(&mut self, msg: &SignalMessage) -> bool {
        match msg {
            SignalMessage::ToggleAudio { enabled } => self.media.audio_enabled = *enabled,
            SignalMessage::ToggleVideo { enabled } => self.media.video_enabled = *enabled,
            _ => return false,
        }
        true
    }
}
