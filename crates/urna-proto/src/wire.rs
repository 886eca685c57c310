//! Value-level framing primitives.
//!
//! Each function reads or writes exactly one self-delimiting value. Reads
//! await until the value is complete; a stream that ends first yields
//! [`WireError::ConnectionClosed`].

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::errors::{WireError, map_io};

/// Maximum byte length of an encodable string (the `u16` length prefix).
pub const MAX_STRING_LEN: usize = u16::MAX as usize;

/// Read one length-prefixed UTF-8 string.
pub async fn read_string<R>(reader: &mut R) -> Result<String, WireError>
where
    R: AsyncRead + Unpin,
{
    let len = reader.read_u16().await.map_err(map_io)? as usize;

    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).await.map_err(map_io)?;

    Ok(String::from_utf8(buf)?)
}

/// Write one length-prefixed UTF-8 string.
///
/// # Errors
///
/// `WireError::StringTooLong` if `value` exceeds [`MAX_STRING_LEN`] bytes;
/// nothing is written in that case, so the stream stays well-framed.
pub async fn write_string<W>(writer: &mut W, value: &str) -> Result<(), WireError>
where
    W: AsyncWrite + Unpin,
{
    let len = value.len();
    if len > MAX_STRING_LEN {
        return Err(WireError::StringTooLong { len, max: MAX_STRING_LEN });
    }

    writer.write_u16(len as u16).await.map_err(map_io)?;
    writer.write_all(value.as_bytes()).await.map_err(map_io)?;

    Ok(())
}

/// Read one big-endian `i32`.
pub async fn read_i32<R>(reader: &mut R) -> Result<i32, WireError>
where
    R: AsyncRead + Unpin,
{
    reader.read_i32().await.map_err(map_io)
}

/// Write one big-endian `i32`.
pub async fn write_i32<W>(writer: &mut W, value: i32) -> Result<(), WireError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_i32(value).await.map_err(map_io)
}
