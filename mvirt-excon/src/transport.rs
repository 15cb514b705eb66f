//! Length-prefixed frames over a pair of byte streams.
//!
//! Wire format:
//!
//! ```text
//! [8 bytes: u64 payload length, native byte order][payload]
//! ```
//!
//! The native byte order matches what the slave writes (`size_t` in host
//! order), so both sides must run on the same host.

use crate::error::TransportError;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

/// Size of the length prefix.
pub const HEADER_LEN: usize = std::mem::size_of::<u64>();

/// Upper bound for the up-front payload allocation. Larger payloads grow the
/// buffer as bytes actually arrive.
const INITIAL_CAPACITY: u64 = 64 * 1024;

/// Read one frame and return its payload unaltered.
///
/// A declared length of zero yields [`TransportError::EmptyFrame`], never an
/// empty payload.
pub async fn receive_frame<R>(input: &mut R) -> Result<Vec<u8>, TransportError>
where
    R: AsyncRead + Unpin,
{
    let mut header = Vec::with_capacity(HEADER_LEN);
    (&mut *input)
        .take(HEADER_LEN as u64)
        .read_to_end(&mut header)
        .await?;

    let header: [u8; HEADER_LEN] = header
        .as_slice()
        .try_into()
        .map_err(|_| TransportError::ShortHeader {
            actual: header.len(),
        })?;

    let length = u64::from_ne_bytes(header);
    if length == 0 {
        return Err(TransportError::EmptyFrame);
    }

    let mut payload = Vec::with_capacity(length.min(INITIAL_CAPACITY) as usize);
    (&mut *input).take(length).read_to_end(&mut payload).await?;

    let actual = payload.len() as u64;
    if actual != length {
        return Err(TransportError::ShortPayload {
            expected: length,
            actual,
        });
    }

    trace!(length, "Received frame");
    Ok(payload)
}

/// Write one frame: the length prefix, then the payload.
///
/// Closing the stream after the last frame is left to the caller.
pub async fn send_frame<W>(output: &mut W, payload: &[u8]) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    let length = payload.len() as u64;

    output.write_all(&length.to_ne_bytes()).await?;
    output.write_all(payload).await?;
    output.flush().await?;

    trace!(length, "Sent frame");
    Ok(())
}
