use crate::connection::ConnectionTable;
use crate::error::SignalingError;
use crate::room::{Departure, JoinOutcome, Room, RoomSummary};
use crate::signaling::SignalingOutput;
use dashmap::DashMap;
use std::sync::Arc;
use tandem_core::{ConnectionId, RoomId, ServerMessage};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

type RoomHandle = Arc<Mutex<Room>>;

/// Process-wide table of rooms and the connections seated in them.
///
/// Each room has its own lock. Membership changes and the notifications they
/// cause are emitted while that lock is held, so no observer ever sees a room
/// halfway through a join or leave. The map itself is only touched to look a
/// room up, insert a fresh one, or drop an empty one.
#[derive(Clone)]
pub struct RoomRegistry {
    rooms: Arc<DashMap<RoomId, RoomHandle>>,
    connections: ConnectionTable,
    signaling: Arc<dyn SignalingOutput>,
}

impl RoomRegistry {
    pub fn new(signaling: Arc<dyn SignalingOutput>) -> Self {
        Self {
            rooms: Arc::new(DashMap::new()),
            connections: ConnectionTable::new(),
            signaling,
        }
    }

    pub fn connections(&self) -> &ConnectionTable {
        &self.connections
    }

    pub(crate) fn signaling(&self) -> &Arc<dyn SignalingOutput> {
        &self.signaling
    }

    pub(crate) fn room(&self, room_id: &RoomId) -> Option<RoomHandle> {
        self.rooms.get(room_id).map(|entry| entry.value().clone())
    }

    pub fn contains_room(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub async fn members_of(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        match self.room(room_id) {
            Some(handle) => handle.lock().await.members().to_vec(),
            None => Vec::new(),
        }
    }

    pub fn attach(&self, id: ConnectionId) {
        if self.connections.attach(id) {
            debug!("Connection {} attached", id);
        }
    }

    pub async fn join(
        &self,
        id: ConnectionId,
        room_id: RoomId,
    ) -> Result<JoinOutcome, SignalingError> {
        let current = self.connections.room_of(&id)?;
        if current.as_ref() == Some(&room_id) {
            warn!("Connection {} is already in room '{}'; join ignored", id, room_id);
            return Ok(JoinOutcome::AlreadySeated);
        }
        let previous = current.and_then(|old| self.room(&old));

        loop {
            let handle = self
                .rooms
                .entry(room_id.clone())
                .or_insert_with(|| {
                    info!("Creating room '{}'", room_id);
                    Arc::new(Mutex::new(Room::new(room_id.clone())))
                })
                .value()
                .clone();

            let (mut room, mut old_room) = lock_pair(&handle, previous.as_ref()).await;
            if room.is_retired() {
                // Emptied between our lookup and our lock; take a fresh entry.
                continue;
            }

            if !self.connections.contains(&id) {
                self.drop_if_empty(&handle, &mut room);
                return Err(SignalingError::UnknownConnection(id));
            }

            // The old seat is only given up once the new one is certain.
            if room.is_full() {
                info!("Room '{}' is full. Rejecting {}", room_id, id);
                self.signaling
                    .send(id, ServerMessage::Full { room: room_id.clone() })
                    .await;
                return Err(SignalingError::RoomFull(room_id));
            }

            if let (Some(old_handle), Some(old)) = (previous.as_ref(), old_room.as_mut()) {
                info!(
                    "Connection {} switches from room '{}' to '{}'",
                    id,
                    old.id(),
                    room_id
                );
                self.depart(&id, old_handle, old).await;
            }

            let role = room.admit(id)?;
            if !self.connections.enter(&id, room_id.clone(), role) {
                // Detached while we were admitting it.
                room.evict(&id);
                self.drop_if_empty(&handle, &mut room);
                return Err(SignalingError::UnknownConnection(id));
            }

            let Some(peer) = room.peer_of(&id) else {
                info!("Room '{}' created by {}", room_id, id);
                self.signaling
                    .send(id, ServerMessage::Created { room: room_id.clone() })
                    .await;
                return Ok(JoinOutcome::Created);
            };

            info!("Connection {} joined room '{}'", id, room_id);
            self.signaling
                .send(id, ServerMessage::JoinedRoom { room: room_id.clone() })
                .await;
            for member in room.members() {
                self.signaling.send(*member, ServerMessage::Ready).await;
            }
            return Ok(JoinOutcome::Joined { peer });
        }
    }

    /// Take a connection out of its room. Returns `None` when it was not in
    /// one, which makes repeated leaves harmless.
    pub async fn leave(&self, id: &ConnectionId) -> Option<Departure> {
        let room_id = self.connections.room_of(id).ok().flatten()?;

        let Some(handle) = self.room(&room_id) else {
            self.connections.vacate(id);
            return None;
        };

        let mut room = handle.lock().await;
        self.depart(id, &handle, &mut room).await
    }

    /// Release the identity, then leave whatever room it held. Safe to call
    /// more than once.
    pub async fn detach(&self, id: &ConnectionId) -> Option<Departure> {
        let Some(conn) = self.connections.release(id) else {
            debug!("Duplicate teardown for {} ignored", id);
            return None;
        };
        debug!(
            "Connection {} released after {:?}",
            id,
            conn.attached_at().elapsed()
        );

        // A join racing this release sees the id gone and backs out itself.
        let room_id = conn.room()?;
        let handle = self.room(room_id)?;
        let mut room = handle.lock().await;
        self.depart(id, &handle, &mut room).await
    }

    pub async fn summaries(&self) -> Vec<RoomSummary> {
        let handles: Vec<RoomHandle> = self
            .rooms
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        let mut out = Vec::with_capacity(handles.len());
        for handle in handles {
            let room = handle.lock().await;
            if room.is_retired() {
                continue;
            }
            out.push(RoomSummary {
                room: room.id().clone(),
                members: room.len(),
                age_secs: room.created_at().elapsed().as_secs(),
            });
        }
        out
    }

    /// Evict `id` from an already locked room and tell whoever remains.
    async fn depart(
        &self,
        id: &ConnectionId,
        handle: &RoomHandle,
        room: &mut Room,
    ) -> Option<Departure> {
        let evicted = room.evict(id);
        self.connections.vacate(id);
        let remaining = evicted?;
        let room_id = room.id().clone();

        match remaining {
            Some(peer) => {
                self.connections.promote(&peer);
                info!("Connection {} left room '{}'; notifying {}", id, room_id, peer);
                self.signaling.send(peer, ServerMessage::PeerLeft).await;
            }
            None => {
                info!("Connection {} left room '{}'; room is now empty", id, room_id);
                self.drop_if_empty(handle, room);
            }
        }

        Some(Departure {
            room: room_id,
            notified: remaining,
        })
    }

    fn drop_if_empty(&self, handle: &RoomHandle, room: &mut Room) {
        if !room.is_empty() {
            return;
        }
        room.retire();
        self.rooms
            .remove_if(room.id(), |_, current| Arc::ptr_eq(current, handle));
        info!("Room '{}' removed", room.id());
    }
}

/// Lock the target room and, when switching, the room being left. Two rooms
/// are always taken in address order so crossing switches cannot deadlock.
async fn lock_pair<'a>(
    target: &'a RoomHandle,
    previous: Option<&'a RoomHandle>,
) -> (MutexGuard<'a, Room>, Option<MutexGuard<'a, Room>>) {
    let Some(previous) = previous else {
        return (target.lock().await, None);
    };
    if Arc::as_ptr(previous) < Arc::as_ptr(target) {
        let old = previous.lock().await;
        (target.lock().await, Some(old))
    } else {
        let room = target.lock().await;
        (room, Some(previous.lock().await))
    }
}
