use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Process-wide stop flag shared by the dispatcher, the interrupt listener and every
/// worker.
///
/// Transitions once from running to stopping. Workers only look at it between jobs.
#[derive(Clone, Default)]
pub struct ShutdownSignal {
    token: CancellationToken,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent.
    pub fn trigger(&self) {
        self.token.cancel();
    }

    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}
