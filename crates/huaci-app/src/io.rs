//! Native messaging framing: every message is a little-endian `u32` byte
//! length followed by that many bytes of UTF-8 JSON.

use kanal::{AsyncReceiver, AsyncSender};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use crate::events::{Inbound, Outbound, parse_inbound};

/// Browsers refuse host messages larger than 1 MiB
pub const MAX_OUTBOUND_FRAME_LEN: usize = 1024 * 1024;

/// Browsers may send up to 4 GiB; anything past this is skipped unread
pub const MAX_INBOUND_FRAME_LEN: usize = 8 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("Frame of {len} bytes exceeds the {limit} byte limit")]
    TooLarge { len: usize, limit: usize },

    #[error("Stream ended inside a frame")]
    Truncated,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read one frame of at most `max_len` bytes. `Ok(None)` means the peer
/// closed the stream between frames. On `TooLarge` the body is still unread.
pub async fn read_frame<R>(reader: &mut R, max_len: usize) -> Result<Option<Vec<u8>>, FrameError>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    let mut filled = 0;
    while filled < len_buf.len() {
        let n = reader.read(&mut len_buf[filled..]).await?;
        if n == 0 {
            return if filled == 0 {
                Ok(None)
            } else {
                Err(FrameError::Truncated)
            };
        }
        filled += n;
    }

    let len = u32::from_le_bytes(len_buf) as usize;
    if len > max_len {
        return Err(FrameError::TooLarge {
            len,
            limit: max_len,
        });
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => FrameError::Truncated,
        _ => FrameError::Io(e),
    })?;
    Ok(Some(body))
}

pub async fn write_frame<W>(writer: &mut W, body: &[u8]) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin,
{
    if body.len() > MAX_OUTBOUND_FRAME_LEN {
        return Err(FrameError::TooLarge {
            len: body.len(),
            limit: MAX_OUTBOUND_FRAME_LEN,
        });
    }

    writer.write_all(&(body.len() as u32).to_le_bytes()).await?;
    writer.write_all(body).await?;
    writer.flush().await?;
    Ok(())
}

/// Skip the body of a frame that was refused for its size.
/// Returns false when the stream ends first.
async fn discard_body<R>(reader: &mut R, len: usize) -> Result<bool, FrameError>
where
    R: AsyncRead + Unpin,
{
    let mut body = (&mut *reader).take(len as u64);
    let skipped = tokio::io::copy(&mut body, &mut tokio::io::sink()).await?;
    Ok(skipped == len as u64)
}

/// Decode frames from the browser until it closes the port. A frame over
/// `max_len` is answered with an error reply and the stream stays usable.
pub async fn reader_io<R>(
    mut reader: R,
    max_len: usize,
    inbound_tx: AsyncSender<Inbound>,
    outbound_tx: AsyncSender<Outbound>,
    cancel: CancellationToken,
) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
{
    loop {
        let frame = tokio::select! {
            frame = read_frame(&mut reader, max_len) => frame,
            _ = cancel.cancelled() => break,
        };

        let frame = match frame {
            Err(e @ FrameError::TooLarge { len, .. }) => {
                tracing::warn!("skipping inbound frame: {e}");
                if !discard_body(&mut reader, len).await? {
                    tracing::info!("browser closed the port");
                    cancel.cancel();
                    break;
                }
                outbound_tx.send(Outbound::error(None, e.to_string())).await?;
                continue;
            }
            other => other?,
        };

        let Some(frame) = frame else {
            tracing::info!("browser closed the port");
            cancel.cancel();
            break;
        };

        match parse_inbound(&frame) {
            Ok(message) => inbound_tx.send(message).await?,
            Err(e) => {
                tracing::warn!("unreadable message: {e}");
                outbound_tx.send(Outbound::error(None, e.to_string())).await?;
            }
        }
    }

    Ok(())
}

/// Single writer so concurrent replies never interleave
pub async fn writer_io<W>(
    mut writer: W,
    outbound_rx: AsyncReceiver<Outbound>,
    cancel: CancellationToken,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    loop {
        let reply = tokio::select! {
            reply = outbound_rx.recv() => reply?,
            _ = cancel.cancelled() => break,
        };

        let body = serde_json::to_vec(&reply)?;
        match write_frame(&mut writer, &body).await {
            Ok(()) => {}
            Err(FrameError::TooLarge { len, .. }) => {
                tracing::error!("dropping {len} byte reply");
                let fallback = serde_json::to_vec(&Outbound::error(reply.id, "reply too large"))?;
                write_frame(&mut writer, &fallback).await?;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
