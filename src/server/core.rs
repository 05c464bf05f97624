use log::{error, info, warn};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tokio::task::{JoinError, JoinSet};

use crate::config::BridgeConfig;
use crate::error::FileError;
use crate::protocol::{Response, handle_request, parse_request};
use crate::storage::FileStorage;

pub struct Server {
    storage: Arc<FileStorage>,
    max_request_bytes: usize,
}

impl Server {
    pub fn new(config: &BridgeConfig) -> Self {
        Self::with_storage(
            Arc::new(FileStorage::from_config(config)),
            config.server.max_request_bytes,
        )
    }

    pub fn with_storage(storage: Arc<FileStorage>, max_request_bytes: usize) -> Self {
        Self {
            storage,
            max_request_bytes,
        }
    }

    /// Serve requests from stdin until it closes, answering on stdout
    pub async fn start(&self) -> io::Result<()> {
        info!("Serving requests on stdin/stdout");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await?;
        info!("Input closed, bridge shutting down");
        Ok(())
    }

    /// Serve newline-delimited requests from `reader`, writing one response
    /// line per request to `writer`. Each request runs as its own task, so
    /// responses may arrive out of order; they carry the request id.
    ///
    /// At most `max_request_bytes + 1` bytes of a line are buffered. Longer
    /// lines are discarded and answered with an error.
    pub async fn serve<R, W>(&self, mut reader: R, writer: W) -> io::Result<W>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let writer = Arc::new(Mutex::new(writer));
        let mut tasks = JoinSet::new();
        let mut line = Vec::new();

        loop {
            line.clear();
            let parsed = match read_bounded_line(&mut reader, &mut line, self.max_request_bytes).await? {
                LineRead::Eof => break,
                LineRead::Oversized => Err(FileError::MissingParameter(format!(
                    "request exceeds {} bytes",
                    self.max_request_bytes
                ))),
                LineRead::Line => {
                    let text = String::from_utf8_lossy(&line);
                    let request_line = text.trim();
                    if request_line.is_empty() {
                        continue;
                    }
                    parse_request(request_line, self.max_request_bytes)
                }
            };

            let storage = Arc::clone(&self.storage);
            let writer = Arc::clone(&writer);

            // Spawn a task per request so slow calls don't block the reader
            tasks.spawn(async move {
                let response = match parsed {
                    Ok(request) => handle_request(storage, request).await,
                    Err(e) => {
                        warn!("Rejected request: {}", e);
                        Response::failure(serde_json::Value::Null, &e)
                    }
                };

                let mut writer = writer.lock().await;
                if let Err(e) = write_response(&mut *writer, &response).await {
                    error!("Failed to write response: {}", e);
                }
            });

            // Reap finished tasks so the set only holds in-flight requests
            while let Some(joined) = tasks.try_join_next() {
                log_join(joined);
            }
        }

        while let Some(joined) = tasks.join_next().await {
            log_join(joined);
        }

        let writer = Arc::try_unwrap(writer)
            .map_err(|_| io::Error::other("response writer still shared"))?;
        Ok(writer.into_inner())
    }
}

enum LineRead {
    Eof,
    Line,
    Oversized,
}

/// Read one line into `buf`, buffering at most `limit + 1` bytes.
/// The remainder of an oversized line is consumed and dropped.
async fn read_bounded_line<R>(reader: &mut R, buf: &mut Vec<u8>, limit: usize) -> io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    let n = (&mut *reader).take(cap).read_until(b'\n', buf).await?;

    if n == 0 {
        return Ok(LineRead::Eof);
    }
    if buf.last() == Some(&b'\n') || buf.len() <= limit {
        return Ok(LineRead::Line);
    }

    discard_line(reader).await?;
    Ok(LineRead::Oversized)
}

async fn discard_line<R>(reader: &mut R) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(());
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(i) => {
                reader.consume(i + 1);
                return Ok(());
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}

fn log_join(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        error!("Request task failed: {}", e);
    }
}

async fn write_response<W>(writer: &mut W, response: &Response) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(response.to_line().as_bytes()).await?;
    writer.flush().await
}
