//! Conflict hand-off from a blocking worker to the task that owns the UI.

use tokio::sync::{mpsc, oneshot};

use crate::conflict::{Conflict, DecisionProvider, Disposition};
use crate::executor::OperationEvent;

/// A conflict waiting for an answer.
///
/// Answer it with [`respond`](Self::respond). Dropping the request without
/// answering aborts the operation.
#[derive(Debug)]
pub struct DecisionRequest {
    conflict: Conflict,
    reply: oneshot::Sender<Disposition>,
}

impl DecisionRequest {
    /// Create a request and the receiver its answer arrives on.
    pub fn new(conflict: Conflict) -> (Self, oneshot::Receiver<Disposition>) {
        let (reply, rx) = oneshot::channel();
        (Self { conflict, reply }, rx)
    }

    /// The conflict being asked about.
    pub fn conflict(&self) -> &Conflict {
        &self.conflict
    }

    /// Answer the request.
    pub fn respond(self, disposition: Disposition) {
        if self.reply.send(disposition).is_err() {
            tracing::debug!(target = %self.conflict.target.display(), "Worker gone before answer");
        }
    }
}

/// Decision provider that forwards each conflict over an event channel and
/// blocks until it is answered.
///
/// Must only be called off the async runtime (e.g. inside `spawn_blocking`).
#[derive(Debug, Clone)]
pub struct ChannelProvider {
    tx: mpsc::Sender<OperationEvent>,
}

impl ChannelProvider {
    /// Create a provider sending on `tx`.
    pub fn new(tx: mpsc::Sender<OperationEvent>) -> Self {
        Self { tx }
    }
}

impl DecisionProvider for ChannelProvider {
    fn decide(&self, conflict: &Conflict) -> Disposition {
        let (request, rx) = DecisionRequest::new(conflict.clone());
        if self.tx.blocking_send(OperationEvent::Decision(request)).is_err() {
            tracing::warn!("Event receiver dropped, aborting");
            return Disposition::Abort;
        }
        rx.blocking_recv().unwrap_or(Disposition::Abort)
    }
}
