use std::path::Path;

use bytes::{Bytes, BytesMut};
use futures::{stream, Stream, StreamExt};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::AppError;

/// Size of every chunk handed to the file and the progress sink.
pub const CHUNK_SIZE: usize = 1024;

/// Receives byte counts as chunks land on disk.
pub trait ProgressSink {
    /// `total` is 0 when the server did not announce a length.
    fn start(&mut self, total: u64);
    fn advance(&mut self, bytes: u64);
    fn finish(&mut self);
}

struct Rechunk<S> {
    inner: S,
    buf: BytesMut,
    exhausted: bool,
}

/// Re-slices a byte stream into `size`-byte chunks; only the last one may be shorter.
///
/// An upstream error is yielded once and ends the stream.
pub fn fixed_chunks<S, E>(inner: S, size: usize) -> impl Stream<Item = Result<Bytes, E>>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
{
    let size = size.max(1);
    let state = Rechunk {
        inner,
        buf: BytesMut::new(),
        exhausted: false,
    };

    stream::unfold(state, move |mut state| async move {
        loop {
            if state.buf.len() >= size {
                let chunk = state.buf.split_to(size).freeze();
                return Some((Ok(chunk), state));
            }
            if state.exhausted {
                if state.buf.is_empty() {
                    return None;
                }
                let rest = state.buf.split().freeze();
                return Some((Ok(rest), state));
            }
            match state.inner.next().await {
                Some(Ok(bytes)) => state.buf.extend_from_slice(&bytes),
                Some(Err(e)) => {
                    state.exhausted = true;
                    state.buf.clear();
                    return Some((Err(e), state));
                }
                None => state.exhausted = true,
            }
        }
    })
}

/// Writes every chunk to `path`, advancing `progress` by each chunk's length.
///
/// Nothing is opened once `cancel` has fired. After that the file is flushed
/// and synced whether the stream ends, fails or is cancelled, and a partial
/// file stays on disk.
pub async fn stream_to_file<S, E>(
    chunks: S,
    path: &Path,
    progress: &mut dyn ProgressSink,
    cancel: &CancellationToken,
) -> Result<u64, AppError>
where
    S: Stream<Item = Result<Bytes, E>>,
    AppError: From<E>,
{
    if cancel.is_cancelled() {
        return Err(AppError::Interrupted);
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(|e| AppError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

    let pumped = pump(chunks, &mut file, path, progress, cancel).await;
    let closed = close(&mut file).await;
    progress.finish();

    let written = pumped?;
    closed.map_err(|e| AppError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!(path = %path.display(), bytes = written, "file written");
    Ok(written)
}

async fn pump<S, E>(
    chunks: S,
    file: &mut File,
    path: &Path,
    progress: &mut dyn ProgressSink,
    cancel: &CancellationToken,
) -> Result<u64, AppError>
where
    S: Stream<Item = Result<Bytes, E>>,
    AppError: From<E>,
{
    futures::pin_mut!(chunks);
    let mut written = 0u64;

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(bytes = written, "download cancelled");
                return Err(AppError::Cancelled(path.to_path_buf()));
            }
            next = chunks.next() => next,
        };

        let Some(chunk) = next else {
            break;
        };
        let chunk = chunk?;

        file.write_all(&chunk).await.map_err(|e| AppError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        written += chunk.len() as u64;
        progress.advance(chunk.len() as u64);
    }

    Ok(written)
}

async fn close(file: &mut File) -> std::io::Result<()> {
    file.flush().await?;
    file.sync_all().await
}

#[cfg(test)]
pub mod recording {
    use super::ProgressSink;

    /// Progress sink that remembers what it was told
    #[derive(Debug, Default)]
    pub struct RecordingProgress {
        pub total: Option<u64>,
        pub position: u64,
        pub updates: Vec<u64>,
        pub finished: bool,
    }

    impl ProgressSink for RecordingProgress {
        fn start(&mut self, total: u64) {
            self.total = Some(total);
        }

        fn advance(&mut self, bytes: u64) {
            self.position += bytes;
            self.updates.push(bytes);
        }

        fn finish(&mut self) {
            self.finished = true;
        }
    }
}
