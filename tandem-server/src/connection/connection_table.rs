use crate::connection::Connection;
use crate::error::SignalingError;
use dashmap::DashMap;
use std::sync::Arc;
use tandem_core::{ConnectionId, MediaState, Role, RoomId, SignalMessage};

/// Every attached connection, keyed by id.
///
/// Entries are only held for the duration of a single read or update, so a
/// caller never keeps a shard locked across an `.await`.
#[derive(Clone, Default)]
pub struct ConnectionTable {
    inner: Arc<DashMap<ConnectionId, Connection>>,
}

impl ConnectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the id was already attached.
    pub fn attach(&self, id: ConnectionId) -> bool {
        if self.inner.contains_key(&id) {
            return false;
        }
        self.inner.insert(id, Connection::new(id));
        true
    }

    pub fn release(&self, id: &ConnectionId) -> Option<Connection> {
        self.inner.remove(id).map(|(_, conn)| conn)
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.inner.contains_key(id)
    }

    pub fn room_of(&self, id: &ConnectionId) -> Result<Option<RoomId>, SignalingError> {
        self.inner
            .get(id)
            .map(|entry| entry.room().cloned())
            .ok_or(SignalingError::UnknownConnection(*id))
    }

    pub fn role_of(&self, id: &ConnectionId) -> Option<Role> {
        self.inner.get(id).map(|entry| entry.role())
    }

    pub fn media_of(&self, id: &ConnectionId) -> Option<MediaState> {
        self.inner.get(id).map(|entry| entry.media())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub(crate) fn enter(&self, id: &ConnectionId, room: RoomId, role: Role) -> bool {
        let Some(mut conn) = self.inner.get_mut(id) else {
            return false;
        };
        conn.enter(room, role);
        true
    }

    pub(crate) fn promote(&self, id: &ConnectionId) {
        if let Some(mut conn) = self.inner.get_mut(id) {
            conn.promote();
        }
    }

    pub(crate) fn vacate(&self, id: &ConnectionId) {
        if let Some(mut conn) = self.inner.get_mut(id) {
            conn.vacate();
        }
    }

    pub(crate) fn apply_media(&self, id: &ConnectionId, msg: &SignalMessage) -> bool {
        self.inner
            .get_mut(id)
            .map(|mut conn| conn.apply_media(msg))
            .unwrap_or(false)
    }
}
