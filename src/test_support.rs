//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use crate::core::action::{Action, Effect, init, update};
use crate::core::state::Session;
use crate::resp::{Connection, SharedConnection};

/// Creates a fresh, not yet connected Session.
pub fn test_session() -> Session {
    Session::new("127.0.0.1:6379", "*")
}

/// A connection over an in-memory pipe whose far end is already gone.
///
/// Reducer tests never perform I/O, so the handle only needs to exist.
pub fn test_connection() -> SharedConnection {
    let (client, _server) = tokio::io::duplex(64);
    Connection::from_stream(client, "test").into_shared()
}

/// Creates a Session that has finished its first connect and sits on the
/// menu.
pub fn connected_session() -> Session {
    let mut session = test_session();
    assert_eq!(init(&mut session), Effect::Connect);
    update(&mut session, Action::ConnectionResult(Ok(test_connection())));
    session
}
