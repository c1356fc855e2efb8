//! # Wire Protocol
//!
//! Everything that touches bytes on the socket: encoding commands, decoding
//! replies and owning the connection. Nothing in here knows about views or
//! key presses.
//!
//! ```text
//! Command ──encode()──▶ bytes ──▶ server ──▶ bytes ──decode()──▶ Reply
//! ```

pub mod command;
pub mod connection;
pub mod error;
pub mod reply;

pub use command::Command;
pub use connection::{Connection, SharedConnection, Transport};
pub use error::RespError;
pub use reply::Reply;
