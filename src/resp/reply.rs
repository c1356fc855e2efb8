//! # Reply Decoding
//!
//! The server answers every command with exactly one reply. The first byte
//! tells us the type:
//!
//! ```text
//! +OK\r\n                 Text
//! -ERR wrong type\r\n     Error
//! :42\r\n                 Integer
//! $5\r\nhello\r\n         Bulk(Some("hello"))
//! $-1\r\n                 Bulk(None)
//! *2\r\n$1\r\na\r\n:1\r\n   Array(Some([..]))
//! *-1\r\n                 Array(None)
//! ```
//!
//! Decoding is structural only. Whether an array is a list of hash fields or
//! a SCAN page is decided by whoever issued the command.
//!
//! Bulk payloads are kept as raw bytes. Conversion to text happens only
//! for display, and [`Reply::is_binary`] tells callers when that
//! conversion was lossy.

use std::io;

use bytes::{BufMut, Bytes, BytesMut};
use futures::future::BoxFuture;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use super::error::RespError;

/// Upper bound on a single bulk payload (matches the server's default
/// `proto-max-bulk-len`).
pub const MAX_BULK_LEN: usize = 512 * 1024 * 1024;

/// How a null bulk string is shown to the user.
pub const NIL: &str = "(nil)";

/// One decoded reply value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Error(String),
    Integer(i64),
    Bulk(Option<Bytes>),
    Array(Option<Vec<Reply>>),
}

impl Reply {
    /// Bulk reply holding `data`.
    pub fn bulk(data: impl Into<Bytes>) -> Self {
        Reply::Bulk(Some(data.into()))
    }

    /// Scalar payload of a status or bulk reply. A null bulk becomes `(nil)`.
    ///
    /// Bulk bytes that are not UTF-8 are shown with replacement characters.
    pub fn into_scalar(self) -> Option<String> {
        match self {
            Reply::Text(s) => Some(s),
            Reply::Bulk(Some(data)) => Some(String::from_utf8_lossy(&data).into_owned()),
            Reply::Bulk(None) => Some(NIL.to_string()),
            _ => None,
        }
    }

    /// True when this reply, or any member of it, carries bulk bytes that
    /// are not valid UTF-8 and so cannot be shown or edited as text
    /// without changing them.
    pub fn is_binary(&self) -> bool {
        match self {
            Reply::Bulk(Some(data)) => std::str::from_utf8(data).is_err(),
            Reply::Array(Some(items)) => items.iter().any(Reply::is_binary),
            _ => false,
        }
    }

    /// Elements of an array whose members are all strings.
    ///
    /// Returns `None` for a null array or when any member is not a string.
    pub fn into_strings(self) -> Option<Vec<String>> {
        match self {
            Reply::Array(Some(items)) => items
                .into_iter()
                .map(|item| match item {
                    Reply::Text(_) | Reply::Bulk(Some(_)) => item.into_scalar(),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }

    /// Serialize back to wire form.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.write_to(&mut buf);
        buf.freeze()
    }

    fn write_to(&self, buf: &mut BytesMut) {
        match self {
            Reply::Text(s) => put_line(buf, b'+', s),
            Reply::Error(s) => put_line(buf, b'-', s),
            Reply::Integer(n) => put_line(buf, b':', &n.to_string()),
            Reply::Bulk(None) => buf.extend_from_slice(b"$-1\r\n"),
            Reply::Bulk(Some(data)) => {
                put_line(buf, b'$', &data.len().to_string());
                buf.extend_from_slice(data);
                buf.extend_from_slice(b"\r\n");
            }
            Reply::Array(None) => buf.extend_from_slice(b"*-1\r\n"),
            Reply::Array(Some(items)) => {
                put_line(buf, b'*', &items.len().to_string());
                for item in items {
                    item.write_to(buf);
                }
            }
        }
    }
}

fn put_line(buf: &mut BytesMut, prefix: u8, body: &str) {
    buf.put_u8(prefix);
    buf.extend_from_slice(body.as_bytes());
    buf.extend_from_slice(b"\r\n");
}

/// Decode exactly one reply from the stream.
///
/// Only the bytes belonging to this reply are consumed. Arrays recurse, so
/// the future is boxed.
pub fn decode<'a, R>(reader: &'a mut R) -> BoxFuture<'a, Result<Reply, RespError>>
where
    R: AsyncBufRead + Unpin + Send,
{
    Box::pin(async move {
        let prefix = reader.read_u8().await?;
        match prefix {
            b'+' => Ok(Reply::Text(read_line(reader).await?)),
            b'-' => Ok(Reply::Error(read_line(reader).await?)),
            b':' => {
                let line = read_line(reader).await?;
                line.trim()
                    .parse::<i64>()
                    .map(Reply::Integer)
                    .map_err(|_| RespError::protocol(format!("invalid integer '{line}'")))
            }
            b'$' => {
                let Some(len) = read_length(reader, "bulk").await? else {
                    return Ok(Reply::Bulk(None));
                };
                if len > MAX_BULK_LEN {
                    return Err(RespError::protocol(format!(
                        "bulk length {len} exceeds {MAX_BULK_LEN}"
                    )));
                }

                let mut data = vec![0u8; len];
                reader.read_exact(&mut data).await?;

                let mut terminator = [0u8; 2];
                reader.read_exact(&mut terminator).await?;
                if &terminator != b"\r\n" {
                    return Err(RespError::protocol("bulk payload not terminated by CRLF"));
                }

                Ok(Reply::Bulk(Some(Bytes::from(data))))
            }
            b'*' => {
                let Some(count) = read_length(reader, "array").await? else {
                    return Ok(Reply::Array(None));
                };

                // Cap the pre-allocation; the count comes from the peer.
                let mut items = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    items.push(decode(&mut *reader).await?);
                }
                Ok(Reply::Array(Some(items)))
            }
            other => Err(RespError::protocol(format!(
                "unexpected reply prefix {:?}",
                other as char
            ))),
        }
    })
}

/// Read up to the next `\n` and strip the line break.
async fn read_line<R>(reader: &mut R) -> Result<String, RespError>
where
    R: AsyncBufRead + Unpin + Send,
{
    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line).await?;
    if line.last() != Some(&b'\n') {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    line.pop();
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    Ok(String::from_utf8_lossy(&line).into_owned())
}

/// Read a length line. `-1` means null and yields `None`.
async fn read_length<R>(reader: &mut R, kind: &str) -> Result<Option<usize>, RespError>
where
    R: AsyncBufRead + Unpin + Send,
{
    let line = read_line(reader).await?;
    let len: i64 = line
        .trim()
        .parse()
        .map_err(|_| RespError::protocol(format!("invalid {kind} length '{line}'")))?;

    match len {
        -1 => Ok(None),
        n if n < -1 => Err(RespError::protocol(format!("invalid {kind} length {n}"))),
        n => usize::try_from(n)
            .map(Some)
            .map_err(|_| RespError::protocol(format!("{kind} length {n} out of range"))),
    }
}
