//! Runs file operations on a blocking worker and reports back over a channel.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use minder_core::{EngineConfig, OpError, Result};
use tokio::sync::mpsc;

use crate::OPERATION_CHANNEL_SIZE;
use crate::conflict::ConflictMode;
use crate::create::{create_directory, touch_file};
use crate::handoff::{ChannelProvider, DecisionRequest};
use crate::operation::FileOperation;
use crate::remove::RemovalEngine;
use crate::report::{OperationKind, OperationReport};
use crate::transfer::{TransferEngine, TransferKind};

/// Called with the displayed directory after an operation changed the
/// filesystem or failed part-way.
pub type RefreshHook = Arc<dyn Fn(&Path) + Send + Sync>;

/// Events sent from a running operation.
#[derive(Debug)]
pub enum OperationEvent {
    /// A conflict needs an answer before the worker continues.
    Decision(DecisionRequest),
    /// The operation finished.
    Complete(OperationComplete),
}

/// Result of a finished operation.
#[derive(Debug)]
pub struct OperationComplete {
    /// Outcomes recorded before completion or failure.
    pub report: OperationReport,
    /// The error that stopped the operation, if any.
    pub error: Option<OpError>,
}

impl OperationComplete {
    fn new(report: OperationReport, result: Result<()>) -> Self {
        Self {
            report,
            error: result.err(),
        }
    }

    /// Check if the operation ran to the end.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Convert into the report, or the error that stopped the operation.
    pub fn into_result(self) -> Result<OperationReport> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.report),
        }
    }
}

/// Executor for file operations.
///
/// Each operation runs on its own blocking worker; conflicts are handed
/// back to the caller as [`OperationEvent::Decision`].
#[derive(Clone)]
pub struct OperationExecutor {
    config: Arc<EngineConfig>,
    mode: ConflictMode,
    refresh: Option<(PathBuf, RefreshHook)>,
}

impl OperationExecutor {
    /// Create an executor with the given engine configuration.
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            config,
            mode: ConflictMode::Ask,
            refresh: None,
        }
    }

    /// Set the initial conflict mode for every operation.
    pub fn with_mode(mut self, mode: ConflictMode) -> Self {
        self.mode = mode;
        self
    }

    /// Call `hook` with `view` after mutating or failed operations.
    pub fn with_refresh(mut self, view: impl Into<PathBuf>, hook: RefreshHook) -> Self {
        self.refresh = Some((view.into(), hook));
        self
    }

    /// Start an operation.
    ///
    /// Returns a receiver for decision requests and the final completion.
    pub fn start(&self, operation: FileOperation) -> mpsc::Receiver<OperationEvent> {
        let (tx, rx) = mpsc::channel(OPERATION_CHANNEL_SIZE);
        let config = Arc::clone(&self.config);
        let mode = self.mode;
        let refresh = self.refresh.clone();

        tokio::spawn(async move {
            let kind = operation.kind();
            let path = operation.primary_path().to_path_buf();
            let worker_tx = tx.clone();

            let joined =
                tokio::task::spawn_blocking(move || run(&config, mode, operation, worker_tx))
                    .await;
            let complete = joined.unwrap_or_else(|e| OperationComplete {
                report: OperationReport::new(kind),
                error: Some(OpError::io(path, io::Error::other(e.to_string()))),
            });

            match &complete.error {
                Some(e) => tracing::warn!(%kind, error = %e, "Operation failed"),
                None => tracing::info!(%kind, summary = %complete.report.summary(), "Operation complete"),
            }

            if complete.report.mutated() || complete.error.is_some() {
                if let Some((view, hook)) = &refresh {
                    hook(view);
                }
            }

            let _ = tx.send(OperationEvent::Complete(complete)).await;
        });

        rx
    }
}

impl std::fmt::Debug for OperationExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationExecutor")
            .field("config", &self.config)
            .field("mode", &self.mode)
            .field("refresh", &self.refresh.as_ref().map(|(view, _)| view))
            .finish()
    }
}

/// Run an operation to completion on the current (blocking) thread.
fn run(
    config: &EngineConfig,
    mode: ConflictMode,
    operation: FileOperation,
    tx: mpsc::Sender<OperationEvent>,
) -> OperationComplete {
    let provider = ChannelProvider::new(tx);
    let kind = operation.kind();

    match operation {
        FileOperation::Copy {
            sources,
            destination,
        } => {
            let mut engine = TransferEngine::new(config, &provider).with_mode(mode);
            let result = engine.transfer_all(&sources, &destination, TransferKind::Copy);
            OperationComplete::new(engine.into_report(), result)
        }
        FileOperation::Move {
            sources,
            destination,
        } => {
            let mut engine = TransferEngine::new(config, &provider).with_mode(mode);
            let result = engine.transfer_all(&sources, &destination, TransferKind::Move);
            OperationComplete::new(engine.into_report(), result)
        }
        FileOperation::Remove { target } => {
            let mut engine = RemovalEngine::new(config, &provider).with_mode(mode);
            let result = engine.remove(&target);
            OperationComplete::new(engine.into_report(), result)
        }
        FileOperation::CreateFile { path } => create(kind, &path, touch_file),
        FileOperation::CreateDirectory { path } => create(kind, &path, create_directory),
    }
}

fn create(
    kind: OperationKind,
    path: &Path,
    f: fn(&Path) -> Result<crate::report::TransferOutcome>,
) -> OperationComplete {
    let mut report = OperationReport::new(kind);
    let result = f(path).map(|outcome| report.record(path, outcome));
    OperationComplete::new(report, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::Disposition;
    use crate::spec::ResolvedSpec;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    async fn drive(
        mut rx: mpsc::Receiver<OperationEvent>,
        answer: Disposition,
    ) -> (OperationComplete, usize) {
        let mut asked = 0;
        while let Some(event) = rx.recv().await {
            match event {
                OperationEvent::Decision(request) => {
                    asked += 1;
                    request.respond(answer);
                }
                OperationEvent::Complete(complete) => return (complete, asked),
            }
        }
        panic!("channel closed without completion");
    }

    #[tokio::test]
    async fn test_copy_without_conflicts() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        let executor = OperationExecutor::new(Arc::new(EngineConfig::default()));

        let rx = executor.start(FileOperation::copy(
            ResolvedSpec::from_path(temp.path().join("a.txt")),
            temp.path().join("b.txt"),
        ));
        let (complete, asked) = drive(rx, Disposition::Abort).await;

        assert!(complete.is_success());
        assert_eq!(asked, 0);
        assert_eq!(fs::read_to_string(temp.path().join("b.txt")).unwrap(), "a");
    }

    #[tokio::test]
    async fn test_conflict_is_handed_back() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "new").unwrap();
        fs::write(temp.path().join("b.txt"), "old").unwrap();
        let executor = OperationExecutor::new(Arc::new(EngineConfig::default()));

        let rx = executor.start(FileOperation::copy(
            ResolvedSpec::from_path(temp.path().join("a.txt")),
            temp.path().join("b.txt"),
        ));
        let (complete, asked) = drive(rx, Disposition::Proceed).await;

        assert!(complete.is_success());
        assert_eq!(asked, 1);
        assert_eq!(fs::read_to_string(temp.path().join("b.txt")).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_abort_stops_operation() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("f"), "x").unwrap();
        let executor =
            OperationExecutor::new(Arc::new(EngineConfig::with_home("/nonexistent-home")));

        let rx = executor.start(FileOperation::remove(ResolvedSpec::from_path(
            temp.path().join("f"),
        )));
        let (complete, _) = drive(rx, Disposition::Abort).await;

        assert!(matches!(complete.error, Some(OpError::Aborted)));
        assert!(temp.path().join("f").exists());
    }

    #[tokio::test]
    async fn test_refresh_hook_runs_after_mutation() {
        let temp = TempDir::new().unwrap();
        let seen: Arc<Mutex<Vec<PathBuf>>> = Arc::default();
        let hook_seen = Arc::clone(&seen);
        let executor = OperationExecutor::new(Arc::new(EngineConfig::default())).with_refresh(
            temp.path(),
            Arc::new(move |dir: &Path| hook_seen.lock().unwrap().push(dir.to_path_buf())),
        );

        let rx = executor.start(FileOperation::create_directory(temp.path().join("new")));
        let (complete, _) = drive(rx, Disposition::Abort).await;
        assert!(complete.is_success());

        // Already exists: nothing changed, no refresh.
        let rx = executor.start(FileOperation::create_directory(temp.path().join("new")));
        drive(rx, Disposition::Abort).await;

        assert_eq!(*seen.lock().unwrap(), vec![temp.path().to_path_buf()]);
    }
}
