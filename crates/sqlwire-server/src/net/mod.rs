//! TCP listener and the per-connection protocol loop.
//!
//! Each accepted connection gets its own task running a simple state
//! machine: read one `;`-delimited query, execute it, write the encoded
//! result, repeat. The loop ends when the peer closes its half of the
//! stream or a result can no longer be written.

use std::net::SocketAddr;
use std::sync::Arc;

use sqlwire_proto::DELIMITER;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, error, info, warn};

use crate::database::Database;
use crate::executor;

/// The sqlwire TCP server.
pub struct Server {
    db: Arc<Database>,
    addr: SocketAddr,
}

impl Server {
    /// Creates a server that will serve `db` on `addr`.
    pub fn new(db: Arc<Database>, addr: SocketAddr) -> Self {
        Self { db, addr }
    }

    /// Binds the listener and accepts connections until the task is
    /// dropped. Accept failures are logged and do not stop the server.
    pub async fn serve(self) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        info!("listening on {}", listener.local_addr()?);

        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    let db = Arc::clone(&self.db);
                    tokio::spawn(handle_connection(stream, peer, db));
                }
                Err(e) => {
                    warn!("failed to accept connection: {e}");
                }
            }
        }
    }
}

/// One framed read off the stream.
#[derive(Debug, PartialEq, Eq)]
enum Frame {
    /// A complete, whitespace-trimmed query (delimiter included).
    Query(String),
    /// The peer closed the stream.
    Closed,
}

/// Serves one client until it disconnects.
async fn handle_connection(stream: TcpStream, peer: SocketAddr, db: Arc<Database>) {
    info!(%peer, "client connected");

    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    loop {
        let query = match read_query(&mut reader).await {
            Frame::Query(query) => query,
            Frame::Closed => break,
        };
        debug!(%peer, %query, "executing");

        let result = executor::execute(&db, &query).await;

        if let Err(e) = write_half.write_all(&result.encode()).await {
            // The peer is unreachable; the result cannot be retried.
            error!(%peer, "failed to send result: {e}");
            break;
        }
    }

    info!(%peer, "client disconnected");
}

/// Reads bytes until the query delimiter or end-of-stream.
///
/// A transient (non-EOF) read failure discards the partial accumulation
/// and keeps the connection: the peer gets another chance on a fresh
/// frame. A delimiter inside a quoted string literal still ends the
/// frame; the protocol is not quote-aware.
async fn read_query<R>(reader: &mut R) -> Frame
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    loop {
        match reader.read_until(DELIMITER, &mut buf).await {
            Ok(0) => return Frame::Closed,
            Ok(_) => {
                if buf.last() == Some(&DELIMITER) {
                    let query = String::from_utf8_lossy(&buf).trim().to_string();
                    return Frame::Query(query);
                }
                // Bytes without a delimiter: the stream ended mid-query.
                // The next read reports end-of-stream and closes the frame.
            }
            Err(e) => {
                warn!("read error while framing query, retrying: {e}");
                buf.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn frame_all(mut input: &[u8]) -> Vec<Frame> {
        let mut reader = BufReader::new(&mut input);
        let mut frames = Vec::new();
        loop {
            let frame = read_query(&mut reader).await;
            let done = frame == Frame::Closed;
            frames.push(frame);
            if done {
                return frames;
            }
        }
    }

    #[tokio::test]
    async fn test_single_query() {
        let frames = frame_all(b"SELECT 1;").await;
        assert_eq!(
            frames,
            vec![Frame::Query("SELECT 1;".to_string()), Frame::Closed]
        );
    }

    #[tokio::test]
    async fn test_surrounding_whitespace_trimmed() {
        let frames = frame_all(b"  \n SELECT 1;").await;
        assert_eq!(frames[0], Frame::Query("SELECT 1;".to_string()));
    }

    #[tokio::test]
    async fn test_multiple_queries_on_one_stream() {
        let frames = frame_all(b"SELECT 1;\nSELECT 2;").await;
        assert_eq!(
            frames,
            vec![
                Frame::Query("SELECT 1;".to_string()),
                Frame::Query("SELECT 2;".to_string()),
                Frame::Closed,
            ]
        );
    }

    #[tokio::test]
    async fn test_eof_without_delimiter_closes() {
        let frames = frame_all(b"SELECT 1").await;
        assert_eq!(frames, vec![Frame::Closed]);
    }

    #[tokio::test]
    async fn test_empty_stream_closes() {
        let frames = frame_all(b"").await;
        assert_eq!(frames, vec![Frame::Closed]);
    }

    #[tokio::test]
    async fn test_delimiter_inside_string_literal_ends_frame() {
        // Documented framing limitation: the delimiter is not quote-aware.
        let frames = frame_all(b"SELECT 'a;b';").await;
        assert_eq!(
            frames,
            vec![
                Frame::Query("SELECT 'a;".to_string()),
                Frame::Query("b';".to_string()),
                Frame::Closed,
            ]
        );
    }
}
