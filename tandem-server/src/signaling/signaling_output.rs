use async_trait::async_trait;
use tandem_core::{ConnectionId, ServerMessage};

/// Outbound half of the signaling transport.
///
/// The registry and router only ever talk to endpoints through this trait, so
/// they can be driven without sockets in tests.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Queue a frame for one connection. Delivery failures are the
    /// implementation's to log; they never propagate back into room logic.
    async fn send(&self, connection_id: ConnectionId, msg: ServerMessage);
}
