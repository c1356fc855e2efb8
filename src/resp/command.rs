//! # Command Encoding
//!
//! Clients talk to the server with a RESP array of bulk strings:
//!
//! ```text
//! *3\r\n$3\r\nSET\r\n$8\r\nmyConfig\r\n$4\r\ntrue\r\n
//! ```
//!
//! Each element is prefixed with its byte length, so no escaping is needed
//! and multi-byte UTF-8 arguments are framed correctly.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

/// A single request: command name plus ordered arguments.
///
/// Built fresh for every request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    args: Vec<String>,
}

impl Command {
    pub fn new<N, I, A>(name: N, args: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Encode the command into wire bytes.
    pub fn encode(&self) -> Bytes {
        let body: usize = std::iter::once(&self.name)
            .chain(&self.args)
            .map(|part| part.len() + 16)
            .sum();
        let mut buf = BytesMut::with_capacity(16 + body);

        put_header(&mut buf, b'*', self.args.len() + 1);
        put_bulk(&mut buf, self.name.as_bytes());
        for arg in &self.args {
            put_bulk(&mut buf, arg.as_bytes());
        }

        buf.freeze()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

fn put_header(buf: &mut BytesMut, prefix: u8, len: usize) {
    buf.put_u8(prefix);
    buf.extend_from_slice(len.to_string().as_bytes());
    buf.extend_from_slice(b"\r\n");
}

fn put_bulk(buf: &mut BytesMut, data: &[u8]) {
    put_header(buf, b'$', data.len());
    buf.extend_from_slice(data);
    buf.extend_from_slice(b"\r\n");
}
