//! Background registry pushes.
//!
//! [`PushDispatcher::dispatch`] starts one `docker push` per service and
//! returns at once. [`PushDispatcher::wait_all`] is the completion barrier:
//! it joins every outstanding push, whatever the individual outcomes.

use std::collections::HashMap;
use std::fmt;
use tagpush_core::ImageReference;
use tagpush_runner::{CommandExecutor, DockerClient, ProcessHandle, PushError};

/// A push started for one service.
#[derive(Debug)]
pub struct PushOperation {
    pub service: String,
    pub image: ImageReference,
    state: PushState,
}

#[derive(Debug)]
enum PushState {
    Running(ProcessHandle),
    NotStarted(PushError),
}

/// Tracks at most one [`PushOperation`] per service name.
#[derive(Debug, Default)]
pub struct PushDispatcher {
    operations: HashMap<String, PushOperation>,
}

impl PushDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start pushing `image` for `service` without waiting for it.
    ///
    /// A push that cannot be started is tracked as failed and reported by
    /// [`wait_all`](Self::wait_all). Returns `false` if `service` already has
    /// a push in flight; the existing operation is kept.
    pub fn dispatch<E: CommandExecutor>(
        &mut self,
        docker: &DockerClient<E>,
        service: &str,
        image: &ImageReference,
    ) -> bool {
        if self.operations.contains_key(service) {
            tracing::warn!(service, "push already dispatched; ignoring duplicate");
            return false;
        }

        let state = match docker.spawn_push(image) {
            Ok(handle) => {
                tracing::info!(service, image = %image, "push started");
                PushState::Running(handle)
            }
            Err(e) => PushState::NotStarted(e),
        };

        self.operations.insert(
            service.to_owned(),
            PushOperation {
                service: service.to_owned(),
                image: image.clone(),
                state,
            },
        );
        true
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn contains(&self, service: &str) -> bool {
        self.operations.contains_key(service)
    }

    /// Wait for every dispatched push to exit.
    ///
    /// Failures do not stop the remaining joins.
    pub async fn wait_all(self) -> PushReport {
        let mut report = PushReport::default();

        for (service, operation) in self.operations {
            tracing::info!(service = %service, "waiting for push to complete");

            let result = match operation.state {
                PushState::Running(handle) => handle.wait().await.map_err(|e| PushError::Push {
                    image: operation.image.to_string(),
                    source: e,
                }),
                PushState::NotStarted(e) => Err(e),
            };

            match result {
                Ok(()) => {
                    tracing::info!(service = %service, "push done");
                    report.completed.push(service);
                }
                Err(error) => {
                    tracing::warn!(service = %service, error = %error, "push failed");
                    report.failed.push(PushFailure {
                        service,
                        image: operation.image,
                        error,
                    });
                }
            }
        }

        report.completed.sort();
        report.failed.sort_by(|a, b| a.service.cmp(&b.service));
        report
    }
}

/// Outcome of the completion barrier.
#[derive(Debug, Default)]
pub struct PushReport {
    pub completed: Vec<String>,
    pub failed: Vec<PushFailure>,
}

impl PushReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.completed.len() + self.failed.len()
    }
}

#[derive(Debug)]
pub struct PushFailure {
    pub service: String,
    pub image: ImageReference,
    pub error: PushError,
}

impl fmt::Display for PushFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.service, self.error)?;
        if let Some(cause) = std::error::Error::source(&self.error) {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}
