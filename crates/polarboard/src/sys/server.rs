use super::runtime::SharedConfig;
use crate::events::BoardEvent;
use crate::protocol::{self, Request, Response};
use async_channel::Sender;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;

/// Longest request line accepted before the connection is dropped.
const MAX_LINE: u64 = 4096;

/// Binds the board socket, replacing a stale one left by an earlier run.
pub fn bind_socket(socket: &Path) -> std::io::Result<UnixListener> {
    if std::fs::metadata(socket).is_ok() {
        let _ = std::fs::remove_file(socket);
    }
    let listener = UnixListener::bind(socket)?;
    log::info!("listening on {}", socket.display());
    Ok(listener)
}

pub async fn run_server(listener: UnixListener, shared: SharedConfig, tx: Sender<BoardEvent>) {
    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let shared = shared.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let (reader, writer) = stream.into_split();
                    if let Err(e) = serve_connection(reader, writer, shared, tx).await {
                        log::warn!("Connection closed with error: {}", e);
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

async fn serve_connection<R, W>(
    reader: R,
    mut writer: W,
    shared: SharedConfig,
    tx: Sender<BoardEvent>,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let n = (&mut reader)
            .take(MAX_LINE + 1)
            .read_until(b'\n', &mut buf)
            .await?;
        if n == 0 {
            return Ok(());
        }
        if !buf.ends_with(b"\n") && n as u64 > MAX_LINE {
            log::warn!("dropping client after {n} bytes without a newline");
            writer.write_all(b"error request too long\n").await?;
            return Ok(());
        }

        let line = String::from_utf8_lossy(&buf);
        if line.trim().is_empty() {
            continue;
        }
        // the read guard must not be held across an await
        let (request, mut response) = {
            let config = shared.read();
            protocol::answer_line(&config.board, &line)
        };

        if request == Some(Request::Reload) {
            response = request_reload(&tx).await;
        }
        log::debug!("{} -> {}", line.trim(), response);

        writer.write_all(format!("{response}\n").as_bytes()).await?;
    }
}

/// Hands the reload to the event loop and waits for its outcome.
async fn request_reload(tx: &Sender<BoardEvent>) -> Response {
    let (reply_tx, reply_rx) = async_channel::bounded(1);
    if tx.send(BoardEvent::ReloadRequested(reply_tx)).await.is_err() {
        return Response::Error("server is shutting down".into());
    }
    match reply_rx.recv().await {
        Ok(true) => Response::Ok,
        Ok(false) => Response::Error("reload failed, previous config kept".into()),
        Err(_) => Response::Error("server is shutting down".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CanvasConfig, Config, ServerConfig, ThemeConfig};
    use parking_lot::RwLock;
    use polargeom::{BoardConfig, Point};
    use std::sync::Arc;
    use tokio::net::UnixStream;

    fn shared() -> SharedConfig {
        Arc::new(RwLock::new(Config {
            board: BoardConfig::new(2, vec![4, 8], Point::default(), 10.0, 50.0).unwrap(),
            theme: ThemeConfig::default(),
            canvas: CanvasConfig::default(),
            server: ServerConfig::default(),
        }))
    }

    /// Connects a client to a fresh connection handler.
    fn connect(tx: Sender<BoardEvent>) -> UnixStream {
        let (client, server) = UnixStream::pair().unwrap();
        tokio::spawn(async move {
            let (reader, writer) = server.into_split();
            serve_connection(reader, writer, shared(), tx).await
        });
        client
    }

    async fn exchange(client: &mut UnixStream, request: &str) -> String {
        client.write_all(request.as_bytes()).await.unwrap();
        let mut reader = BufReader::new(client);
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        line
    }

    #[tokio::test]
    async fn test_answers_queries() {
        let (tx, _rx) = async_channel::unbounded();
        let mut client = connect(tx);
        assert_eq!(exchange(&mut client, "hit 20 0\n").await, "cell 0 0\n");
        assert_eq!(exchange(&mut client, "\nneighbors 0:0\n").await, "cells 0:1 0:3 1:0\n");
    }

    #[tokio::test]
    async fn test_reload_reports_the_event_loop_outcome() {
        let (tx, rx) = async_channel::unbounded();
        tokio::spawn(async move {
            let mut outcomes = [true, false].into_iter();
            while let Ok(event) = rx.recv().await {
                if let BoardEvent::ReloadRequested(reply) = event {
                    let _ = reply.send(outcomes.next().unwrap_or(false)).await;
                }
            }
        });

        let mut client = connect(tx);
        assert_eq!(exchange(&mut client, "reload\n").await, "ok\n");
        assert!(exchange(&mut client, "reload\n").await.starts_with("error reload failed"));
    }

    #[tokio::test]
    async fn test_reload_without_event_loop_is_an_error() {
        let (tx, rx) = async_channel::unbounded();
        drop(rx);
        let mut client = connect(tx);
        assert!(exchange(&mut client, "reload\n").await.starts_with("error server"));
    }

    #[tokio::test]
    async fn test_overlong_line_drops_connection() {
        let (tx, _rx) = async_channel::unbounded();
        let mut client = connect(tx);
        let flood = "7".repeat(MAX_LINE as usize + 100);
        assert_eq!(exchange(&mut client, &flood).await, "error request too long\n");

        let mut rest = [0u8; 16];
        assert!(matches!(client.read(&mut rest).await, Ok(0) | Err(_)));
    }

    #[tokio::test]
    async fn test_bind_replaces_stale_socket() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("board.sock");
        fs_err::write(&socket, "stale").unwrap();
        assert!(bind_socket(&socket).is_ok());

        assert!(bind_socket(&dir.path().join("missing").join("board.sock")).is_err());
    }
}
