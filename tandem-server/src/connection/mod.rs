mod connection;
mod connection_table;

pub use connection::*;
pub use connection_table::*;
