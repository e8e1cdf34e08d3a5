mod connection;
mod media;
mod role;
mod room;
mod signaling;

pub use connection::ConnectionId;
pub use media::MediaState;
pub use role::Role;
pub use room::RoomId;
pub use signaling::{ClientMessage, IceServerConfig, Inbound, ProtocolError, ServerMessage, SignalMessage};
