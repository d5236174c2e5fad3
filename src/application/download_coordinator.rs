use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    api::{ApiClient, ApiError, DownloadRequest},
    config::{resolve_instance, ConfigStore},
    domain::{AppError, DownloadOutcome, RunPhase},
    utils::output_path,
};

use super::transfer::{fixed_chunks, stream_to_file, ProgressSink, CHUNK_SIZE};

/// Everything one invocation asks for
#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub instance: Option<String>,
    pub output: Option<String>,
    pub request: DownloadRequest,
}

pub struct DownloadCoordinator {
    api_client: ApiClient,
    phase: RunPhase,
}

impl DownloadCoordinator {
    pub fn new(api_client: ApiClient) -> Self {
        Self {
            api_client,
            phase: RunPhase::Start,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    fn advance(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        let next = self.phase.next();
        debug!(from = ?self.phase, to = ?next, "phase");
        self.phase = next;
    }

    /// Resolves the instance, makes the one resolution call, then the one download.
    ///
    /// Any error is final; nothing is retried.
    pub async fn run(
        &mut self,
        job: &DownloadJob,
        store: &dyn ConfigStore,
        progress: &mut dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<DownloadOutcome, AppError> {
        let result = self.drive(job, store, progress, cancel).await;
        if result.is_err() {
            debug!(from = ?self.phase, "phase failed");
            self.phase = RunPhase::Failed;
        }
        result
    }

    async fn drive(
        &mut self,
        job: &DownloadJob,
        store: &dyn ConfigStore,
        progress: &mut dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<DownloadOutcome, AppError> {
        let instance = resolve_instance(job.instance.as_deref(), store)?;
        self.advance();

        println!("Contacting Cobalt.tools instance at {instance}...");
        self.advance();
        let resolved =
            until_cancelled(cancel, self.api_client.resolve(&instance, &job.request)).await?;
        self.advance();
        info!(media = %resolved.url, filename = %resolved.filename, "resolved");

        let path = output_path(job.output.as_deref(), &resolved.filename);

        println!("Starting download...");
        let (total_size, stream) =
            until_cancelled(cancel, self.api_client.download_file_stream(&resolved.url)).await?;
        self.advance();

        progress.start(total_size.unwrap_or(0));
        let chunks = fixed_chunks(stream, CHUNK_SIZE);
        let bytes = stream_to_file(chunks, &path, progress, cancel).await?;
        self.advance();

        Ok(DownloadOutcome { path, bytes })
    }
}

/// Drops `call` as soon as `cancel` fires; a token that is already
/// cancelled means the call is never polled.
async fn until_cancelled<T>(
    cancel: &CancellationToken,
    call: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, AppError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            info!("cancelled before download");
            Err(AppError::Interrupted)
        }
        result = call => Ok(result?),
    }
}
