use crate::error::SignalingError;
use crate::room::{Departure, JoinOutcome, RoomRegistry};
use tandem_core::{ClientMessage, ConnectionId, Inbound, RoomId, ServerMessage, SignalMessage};
use tracing::{debug, info, warn};

/// Turns inbound frames into registry operations and peer-to-peer relays.
#[derive(Clone)]
pub struct SignalingRouter {
    registry: RoomRegistry,
}

impl SignalingRouter {
    pub fn new(registry: RoomRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    pub fn attach(&self, id: ConnectionId) {
        self.registry.attach(id);
    }

    /// Single teardown path for both a graceful close and a lost transport.
    pub async fn detach(&self, id: &ConnectionId) -> Option<Departure> {
        self.registry.detach(id).await
    }

    pub async fn join(
        &self,
        id: ConnectionId,
        room: RoomId,
    ) -> Result<JoinOutcome, SignalingError> {
        self.registry.join(id, room).await
    }

    /// Leave the named room. A leave naming a room the connection is not in
    /// is ignored.
    pub async fn leave(&self, id: &ConnectionId, room: &RoomId) -> Option<Departure> {
        match self.registry.connections().room_of(id) {
            Ok(Some(current)) if &current == room => self.registry.leave(id).await,
            Ok(Some(current)) => {
                warn!(
                    "Connection {} asked to leave '{}' but is in '{}'",
                    id, room, current
                );
                None
            }
            _ => {
                debug!("Connection {} left '{}' while not in a room", id, room);
                None
            }
        }
    }

    /// Forward a payload to the sender's room peer, unmodified.
    ///
    /// The room lock is held across the send so the peer cannot leave between
    /// lookup and delivery. Media toggles are recorded even when nobody is
    /// there to receive them.
    pub async fn relay(&self, sender: &ConnectionId, msg: SignalMessage) -> Result<(), SignalingError> {
        let room_id = self
            .registry
            .connections()
            .room_of(sender)?
            .ok_or(SignalingError::Unrouted(*sender))?;
        let handle = self
            .registry
            .room(&room_id)
            .ok_or(SignalingError::Unrouted(*sender))?;

        let room = handle.lock().await;
        if !room.contains(sender) {
            return Err(SignalingError::Unrouted(*sender));
        }

        self.registry.connections().apply_media(sender, &msg);

        let peer = room.peer_of(sender).ok_or(SignalingError::NoPeer(*sender))?;
        self.registry
            .signaling()
            .send(peer, ServerMessage::from(msg))
            .await;
        Ok(())
    }

    /// Entry point for every frame read off a connection. Failures stay with
    /// the sender; only `Full` is ever reported back, and the registry has
    /// already sent it.
    pub async fn dispatch(&self, sender: ConnectionId, msg: ClientMessage) {
        match Inbound::from(msg) {
            Inbound::Join(room) => {
                info!("Connection {} requested to join room '{}'", sender, room);
                if let Err(e) = self.join(sender, room).await {
                    info!("Join from {} refused: {}", sender, e);
                }
            }
            Inbound::Leave(room) => {
                self.leave(&sender, &room).await;
            }
            Inbound::Relay(signal) => match self.relay(&sender, signal).await {
                Ok(()) => debug!("Relayed frame from {}", sender),
                Err(e @ SignalingError::NoPeer(_)) => debug!("Dropped: {}", e),
                Err(e) => warn!("Dropped frame: {}", e),
            },
        }
    }
}
