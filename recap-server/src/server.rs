//! Unix socket transport: 4-byte little-endian length-prefixed MessagePack
//! frames, one RpcRequest per frame, RpcResponse envelope back.

use crate::router;
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use recap_core::rpc::{RpcRequest, RpcResponse};
use sqlx::SqlitePool;
use std::path::Path;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::broadcast;
use tokio_util::codec::{FramedRead, FramedWrite, LengthDelimitedCodec};

pub async fn run_unix_server(
    socket_path: &str,
    pool: SqlitePool,
    mut shutdown: broadcast::Receiver<()>,
) -> anyhow::Result<()> {
    if Path::new(socket_path).exists() {
        std::fs::remove_file(socket_path)?;
    }

    let listener = UnixListener::bind(socket_path)?;
    tracing::info!("IPC Server listening on {}", socket_path);

    // Run the accept loop to completion, then remove the socket file whether
    // the loop ended by shutdown or by an accept error.
    let result = accept_loop(&listener, pool, &mut shutdown).await;
    if Path::new(socket_path).exists() {
        std::fs::remove_file(socket_path)?;
    }
    result
}

async fn accept_loop(
    listener: &UnixListener,
    pool: SqlitePool,
    shutdown: &mut broadcast::Receiver<()>,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            res = listener.accept() => {
                let (stream, _) = res?;
                let pool = pool.clone();
                tokio::spawn(async move {
                    handle_connection(stream, pool).await;
                });
            }
            _ = shutdown.recv() => {
                tracing::info!("Shutting down IPC server...");
                return Ok(());
            }
        }
    }
}

async fn handle_connection(stream: UnixStream, pool: SqlitePool) {
    let (read, write) = stream.into_split();
    let le_codec = || LengthDelimitedCodec::builder().little_endian().new_codec();
    let mut framed_read = FramedRead::new(read, le_codec());
    let mut framed_write = FramedWrite::new(write, le_codec());

    while let Some(frame) = framed_read.next().await {
        match frame {
            Ok(bytes_mut) => {
                let request: RpcRequest = match rmp_serde::from_slice(&bytes_mut) {
                    Ok(req) => req,
                    Err(e) => {
                        let resp = RpcResponse::err(format!("Deserialization error: {}", e));
                        match rmp_serde::to_vec_named(&resp) {
                            Ok(resp_bytes) => {
                                let _ = framed_write.send(Bytes::from(resp_bytes)).await;
                            }
                            Err(se) => {
                                tracing::error!("Failed to serialize error response: {}", se)
                            }
                        }
                        continue;
                    }
                };

                let response = router::handle_request(request, &pool).await;
                match rmp_serde::to_vec_named(&response) {
                    Ok(resp_bytes) => {
                        if let Err(e) = framed_write.send(Bytes::from(resp_bytes)).await {
                            tracing::error!("Failed to send response: {}", e);
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to serialize response: {}", e);
                        break;
                    }
                }
            }
            Err(e) => {
                tracing::error!("Frame error: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recap_core::db::memory_pool;
    use tokio_util::codec::Framed;

    fn temp_socket_path(tag: &str) -> String {
        std::env::temp_dir()
            .join(format!("recap-{}-{}.sock", tag, std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    #[tokio::test]
    async fn socket_round_trip_and_file_cleanup_on_shutdown() {
        let path = temp_socket_path("lifecycle");
        let pool = memory_pool().await.unwrap();
        let (tx, rx) = broadcast::channel(1);

        let server = tokio::spawn({
            let path = path.clone();
            async move { run_unix_server(&path, pool, rx).await }
        });

        // Wait for the listener to bind.
        for _ in 0..100 {
            if Path::new(&path).exists() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(Path::new(&path).exists(), "socket file should appear");

        let stream = UnixStream::connect(&path).await.unwrap();
        let codec = LengthDelimitedCodec::builder().little_endian().new_codec();
        let mut framed = Framed::new(stream, codec);

        let frame = rmp_serde::to_vec_named(&RpcRequest::Healthcheck).unwrap();
        framed.send(Bytes::from(frame)).await.unwrap();
        let reply = framed.next().await.unwrap().unwrap();
        let resp: RpcResponse = rmp_serde::from_slice(&reply).unwrap();
        assert_eq!(resp.status, "ok");

        drop(framed);
        tx.send(()).unwrap();
        server.await.unwrap().unwrap();
        assert!(
            !Path::new(&path).exists(),
            "socket file should be removed after the server exits"
        );
    }
}
