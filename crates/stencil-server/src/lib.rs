//! Static HTTPS preview server for generated artifacts.

pub mod handler;
pub mod index;
pub mod server;

pub use crate::handler::{ServerState, respond};
pub use crate::server::HttpsServer;
