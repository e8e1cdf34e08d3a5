pub use tandem_core::{ConnectionId, RoomId};

pub mod model {
    pub use tandem_core::model::*;
}

pub mod negotiation {
    pub use tandem_core::negotiation::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use tandem_server::*;
}
