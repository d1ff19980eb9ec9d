//! Bridge between controllers on the UI thread and the backend worker running remote calls.

pub mod commands;
pub mod runtime;
pub mod session;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("failed to build backend runtime: {0}")]
    Runtime(std::io::Error),
    #[error("failed to spawn backend worker thread: {0}")]
    Thread(std::io::Error),
}

/// A command could not be handed to the backend worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("backend command queue is full")]
    QueueFull,
    #[error("backend command processor disconnected")]
    WorkerGone,
}
