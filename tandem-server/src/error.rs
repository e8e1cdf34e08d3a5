use tandem_core::{ConnectionId, RoomId};
use thiserror::Error;

/// Failures scoped to a single connection. None of these reach the peer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignalingError {
    /// Join against a room that already has two members.
    #[error("room '{0}' is full")]
    RoomFull(RoomId),

    /// Relay from a connection that is not in any room.
    #[error("connection {0} is not in a room")]
    Unrouted(ConnectionId),

    /// Relay while the sender is alone in its room. Benign.
    #[error("connection {0} has no peer to relay to")]
    NoPeer(ConnectionId),

    #[error("connection {0} is not attached")]
    UnknownConnection(ConnectionId),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TURN credentials were given without a TURN url")]
    OrphanTurnCredentials,

    #[error("at least one ICE server url is required")]
    NoIceServers,
}
