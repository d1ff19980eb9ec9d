//! Per-screen reply channel and liveness tracking.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};

use crate::{
    backend_bridge::{
        commands::{BackendCommand, RequestId},
        DispatchError,
    },
    controller::{events::UiEvent, orchestration::dispatch_backend_command},
};

const REPLY_QUEUE_DEPTH: usize = 8;

/// Shared flag telling in-flight jobs whether their screen still exists.
#[derive(Debug, Clone)]
pub struct ScreenLiveness(Arc<AtomicBool>);

impl ScreenLiveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn detach(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_attached(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for ScreenLiveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the worker sends the single result of one command.
pub struct ReplyHandle {
    tx: Sender<UiEvent>,
    liveness: ScreenLiveness,
}

impl ReplyHandle {
    /// Hands the result to the screen, or drops it if the screen is gone.
    pub fn deliver(self, event: UiEvent) {
        let request = event.request();
        if !self.liveness.is_attached() {
            tracing::debug!(%request, "screen detached; dropping result");
            return;
        }
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Disconnected(_)) => {
                tracing::debug!(%request, "screen gone; dropping result");
            }
            Err(TrySendError::Full(_)) => {
                tracing::warn!(%request, "screen reply queue is full; dropping result");
            }
        }
    }
}

/// One screen's connection to the backend worker.
///
/// Dropping the session detaches the screen so late results are discarded.
pub struct BridgeSession {
    cmd_tx: Sender<BackendCommand>,
    reply_tx: Sender<UiEvent>,
    reply_rx: Receiver<UiEvent>,
    liveness: ScreenLiveness,
    next_request: u64,
}

impl BridgeSession {
    pub(crate) fn new(cmd_tx: Sender<BackendCommand>) -> Self {
        let (reply_tx, reply_rx) = bounded(REPLY_QUEUE_DEPTH);
        Self {
            cmd_tx,
            reply_tx,
            reply_rx,
            liveness: ScreenLiveness::new(),
            next_request: 0,
        }
    }

    /// A fresh session for another screen on the same backend worker.
    pub(crate) fn sibling(&self) -> Self {
        Self::new(self.cmd_tx.clone())
    }

    /// Allocates a request id and queues the command built for it.
    pub(crate) fn dispatch(
        &mut self,
        build: impl FnOnce(RequestId, ReplyHandle) -> BackendCommand,
    ) -> Result<RequestId, DispatchError> {
        self.next_request += 1;
        let request = RequestId(self.next_request);
        let reply = ReplyHandle {
            tx: self.reply_tx.clone(),
            liveness: self.liveness.clone(),
        };
        dispatch_backend_command(&self.cmd_tx, build(request, reply))?;
        Ok(request)
    }

    pub(crate) fn try_next(&self) -> Option<UiEvent> {
        self.reply_rx.try_recv().ok()
    }

    /// Blocks until a result arrives or `deadline` passes. With no deadline it waits indefinitely.
    pub(crate) fn next_before(&self, deadline: Option<Instant>) -> Option<UiEvent> {
        let Some(deadline) = deadline else {
            return self.reply_rx.recv().ok();
        };
        let timeout = deadline.saturating_duration_since(Instant::now());
        if timeout == Duration::ZERO {
            return self.try_next();
        }
        match self.reply_rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub(crate) fn detach(&self) {
        self.liveness.detach();
    }
}

impl Drop for BridgeSession {
    fn drop(&mut self) {
        self.liveness.detach();
    }
}
