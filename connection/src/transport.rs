//! The outbound half of a connection.

use std::io;
use std::sync::Arc;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::trace;

/// Writes complete frames to the peer.
///
/// `send` must not block: implementations hand the frame to whatever
/// owns the socket.
pub trait Transport: Send + Sync {
    /// Writes exactly one framed packet.
    fn send(&self, frame: &[u8]) -> io::Result<()>;
}

impl Transport for mpsc::UnboundedSender<Vec<u8>> {
    fn send(&self, frame: &[u8]) -> io::Result<()> {
        mpsc::UnboundedSender::send(self, frame.to_vec())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "transport channel closed"))
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, frame: &[u8]) -> io::Result<()> {
        (**self).send(frame)
    }
}

/// Writes frames from `rx` to `writer` until every sender is gone.
///
/// Pairs with the channel [`Transport`] to drive a socket's write half.
pub async fn write_frames<W>(mut rx: mpsc::UnboundedReceiver<Vec<u8>>, mut writer: W) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(frame) = rx.recv().await {
        trace!(len = frame.len(), "writing frame");
        writer.write_all(&frame).await?;
        writer.flush().await?;
    }
    writer.shutdown().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[test]
    fn channel_transport_copies_frames() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        Transport::send(&tx, &[4, 3, 0, 0]).unwrap();
        assert_eq!(rx.try_recv().unwrap(), vec![4, 3, 0, 0]);

        drop(rx);
        let err = Transport::send(&tx, &[4, 3, 0, 0]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[tokio::test]
    async fn frames_written_in_order() {
        let (tx, rx) = mpsc::unbounded_channel();
        let (client, mut server) = tokio::io::duplex(64);
        Transport::send(&tx, &[4, 3, 1, 3]).unwrap();
        Transport::send(&tx, &[4, 3, 0, 0]).unwrap();
        drop(tx);

        write_frames(rx, client).await.unwrap();
        let mut written = Vec::new();
        server.read_to_end(&mut written).await.unwrap();
        assert_eq!(written, vec![4, 3, 1, 3, 4, 3, 0, 0]);
    }
}
