//! MongoDB connection lifecycle
//!
//! Connect, verify with a ping, serve admin commands, disconnect once.

mod client;
mod state;

pub use client::MongoHandle;
pub use state::{ConnectionState, ConnectionStatus};
