use std::path::{Path, PathBuf};

use tokio::{fs::File, io::{AsyncWriteExt, BufWriter}, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use crate::export::{ExportError, PageSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    Completed { pages: usize },
    Cancelled { pages: usize },
}

impl ExportOutcome {
    pub fn pages(&self) -> usize {
        match self {
            ExportOutcome::Completed { pages } | ExportOutcome::Cancelled { pages } => *pages,
        }
    }
}

/// Writes a report's pages to a file on a background task.
///
/// [`ExportJob::cancel`] only returns once the task has exited, so the target
/// file is closed by then.
pub struct ExportJob {
    id: Uuid,
    target: PathBuf,
    token: CancellationToken,
    handle: JoinHandle<Result<ExportOutcome, ExportError>>,
}

impl ExportJob {
    /// Spawn the export on the current tokio runtime.
    pub fn start<S: PageSource>(source: S, target: impl AsRef<Path>) -> Self {
        Self::start_with_token(source, target, CancellationToken::new())
    }

    /// Like [`ExportJob::start`], cancelled through a token the caller owns.
    pub fn start_with_token<S: PageSource>(source: S, target: impl AsRef<Path>, token: CancellationToken) -> Self {
        let id = Uuid::new_v4();
        let target = target.as_ref().to_path_buf();

        info!(export = %id, target = %target.display(), pages = source.page_count(), "export started");
        let handle = tokio::spawn(Self::run(id, source, target.clone(), token.clone()));

        Self { id, target, token, handle }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Signal cancellation and wait for the worker to exit.
    pub async fn cancel(self) -> Result<ExportOutcome, ExportError> {
        self.token.cancel();
        self.join().await
    }

    /// Wait for the export to finish on its own.
    pub async fn finish(self) -> Result<ExportOutcome, ExportError> {
        self.join().await
    }

    async fn join(self) -> Result<ExportOutcome, ExportError> {
        let outcome = self.handle.await.map_err(|e| ExportError::Task(e.to_string()))??;
        info!(export = %self.id, outcome = ?outcome, "export finished");
        Ok(outcome)
    }

    async fn run<S: PageSource>(
        id: Uuid,
        mut source: S,
        target: PathBuf,
        token: CancellationToken,
    ) -> Result<ExportOutcome, ExportError> {
        let mut writer = BufWriter::new(File::create(&target).await?);
        let mut written = 0;

        for index in 0..source.page_count() {
            if token.is_cancelled() {
                break;
            }

            let page = source.render_page(index)?;
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                result = writer.write_all(&page) => result?,
            }
            written += 1;
            tokio::task::yield_now().await;
        }

        writer.flush().await?;
        writer.into_inner().sync_all().await?;

        if token.is_cancelled() {
            info!(export = %id, pages = written, "export cancelled");
            return Ok(ExportOutcome::Cancelled { pages: written });
        }
        Ok(ExportOutcome::Completed { pages: written })
    }
}
