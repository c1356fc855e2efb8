use std::io;

use thiserror::Error;

/// Failures surfaced by the wire layer.
///
/// The split matters to the session: transport failures send it back to
/// Loading and reconnect, protocol failures are reported in place.
#[derive(Debug, Error)]
pub enum RespError {
    /// Malformed length field, bad terminator or unknown type prefix.
    #[error("protocol error: {0}")]
    Protocol(String),
    /// Write/read failure or end of stream on the socket.
    #[error("connection error: {0}")]
    Transport(#[from] io::Error),
    /// A command was requested while no connection was established.
    #[error("not connected")]
    NotConnected,
}

impl RespError {
    pub(crate) fn protocol(msg: impl Into<String>) -> Self {
        RespError::Protocol(msg.into())
    }

    /// True for failures that should route through the reconnect path.
    pub fn is_transport(&self) -> bool {
        matches!(self, RespError::Transport(_) | RespError::NotConnected)
    }
}
