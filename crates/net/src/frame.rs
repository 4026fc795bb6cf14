//! Length-prefixed framing for the host bridge
//!
//! Wire format: [4-byte big-endian length][JSON payload], at most 1 MiB per frame.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Error, Result};
use crate::protocol::BridgeMessage;

const MAX_FRAME_SIZE: u32 = 1024 * 1024;

fn closed_on_eof(e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        Error::ConnectionClosed
    } else {
        Error::Io(e)
    }
}

fn check_len(len: u32) -> Result<()> {
    match len {
        0 => Err(Error::Protocol("Empty frame".into())),
        n if n > MAX_FRAME_SIZE => Err(Error::Protocol(format!(
            "Frame too large: {n} bytes (max {MAX_FRAME_SIZE})"
        ))),
        _ => Ok(()),
    }
}

/// Read one message. A clean end of stream is [`Error::ConnectionClosed`].
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<BridgeMessage> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await.map_err(closed_on_eof)?;
    let len = u32::from_be_bytes(len_buf);
    check_len(len)?;

    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload).await.map_err(closed_on_eof)?;

    BridgeMessage::from_bytes(&payload).map_err(|e| Error::Protocol(format!("Invalid JSON: {e}")))
}

/// Write one message and flush
pub async fn write_frame<W: AsyncWrite + Unpin>(writer: &mut W, msg: &BridgeMessage) -> Result<()> {
    let payload = msg
        .to_bytes()
        .map_err(|e| Error::Protocol(format!("Serialization failed: {e}")))?;
    let len = u32::try_from(payload.len()).unwrap_or(u32::MAX);
    check_len(len)?;

    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(&payload).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use haxroom_core::{HostEvent, Team};
    use std::io::Cursor;

    #[tokio::test]
    async fn test_frames_are_read_in_order() {
        let mut buf = Vec::new();
        write_frame(&mut buf, &BridgeMessage::Ping).await.unwrap();
        write_frame(
            &mut buf,
            &BridgeMessage::Event(HostEvent::TeamGoal { team: Team::Red }),
        )
        .await
        .unwrap();

        let mut cursor = Cursor::new(buf);
        assert_eq!(read_frame(&mut cursor).await.unwrap(), BridgeMessage::Ping);
        assert_eq!(
            read_frame(&mut cursor).await.unwrap(),
            BridgeMessage::Event(HostEvent::TeamGoal { team: Team::Red })
        );
        assert!(matches!(
            read_frame(&mut cursor).await,
            Err(Error::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn test_empty_frame_rejected() {
        // 4 zero bytes = length 0
        let mut cursor = Cursor::new(vec![0, 0, 0, 0]);
        let result = read_frame(&mut cursor).await;
        assert!(matches!(result, Err(Error::Protocol(_))));
    }

    #[tokio::test]
    async fn test_oversized_frame_rejected() {
        let len = (MAX_FRAME_SIZE + 1).to_be_bytes();
        let mut cursor = Cursor::new(len.to_vec());
        let result = read_frame(&mut cursor).await;
        assert!(matches!(result, Err(Error::Protocol(_))));
    }

    #[tokio::test]
    async fn test_truncated_payload_is_closed_connection() {
        let mut bytes = 10u32.to_be_bytes().to_vec();
        bytes.extend_from_slice(b"{\"ty");
        let mut cursor = Cursor::new(bytes);
        assert!(matches!(
            read_frame(&mut cursor).await,
            Err(Error::ConnectionClosed)
        ));
    }
}
