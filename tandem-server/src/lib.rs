mod app;
mod config;
mod connection;
mod error;
mod room;
mod signaling;

pub use app::*;
pub use config::*;
pub use connection::*;
pub use error::*;
pub use room::*;
pub use signaling::*;
