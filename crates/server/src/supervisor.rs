use std::future::Future;

use anyhow::{Error, Result};
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

/// Runs named long-lived tasks, cancelling all of them when one fails or
/// when Ctrl-C arrives.
pub struct Supervisor {
    shutdown: CancellationToken,
    tasks: JoinSet<(&'static str, Result<()>)>,
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Supervisor {
    pub fn new() -> Self {
        Self {
            shutdown: CancellationToken::new(),
            tasks: JoinSet::new(),
        }
    }

    /// Token cancelled when the supervisor begins shutting down.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn spawn<F, Fut>(&mut self, name: &'static str, factory: F)
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let shutdown = self.shutdown.child_token();
        self.tasks.spawn(async move { (name, factory(shutdown).await) });
    }

    pub async fn run(mut self) -> Result<()> {
        let mut first_err: Option<Error> = None;

        while !self.tasks.is_empty() {
            tokio::select! {
                Some(outcome) = self.tasks.join_next() => {
                    self.handle_task_outcome(&mut first_err, outcome);
                }
                _ = tokio::signal::ctrl_c(), if !self.shutdown.is_cancelled() => {
                    tracing::info!("Received Ctrl-C, shutting down");
                    self.shutdown.cancel();
                }
            }
        }

        first_err.map_or(Ok(()), Err)
    }

    fn handle_task_outcome(
        &self,
        first_err: &mut Option<Error>,
        outcome: std::result::Result<(&'static str, Result<()>), JoinError>,
    ) {
        let err = match outcome {
            Ok((name, Ok(()))) => {
                tracing::info!(task = name, "Task exited gracefully");
                return;
            }
            Ok((name, Err(err))) => {
                tracing::error!(task = name, "Task exited with error: {:#}", err);
                err
            }
            Err(join_err) => {
                tracing::error!("Task panicked: {:?}", join_err);
                join_err.into()
            }
        };

        first_err.get_or_insert(err);
        if !self.shutdown.is_cancelled() {
            tracing::info!("Supervisor shutting down");
            self.shutdown.cancel();
        }
    }
}
