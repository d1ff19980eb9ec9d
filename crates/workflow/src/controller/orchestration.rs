//! Command orchestration from controller actions to the backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::{commands::BackendCommand, DispatchError};

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), DispatchError> {
    let cmd_name = cmd.name();
    let request = cmd.request();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, %request, "queued controller->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, %request, "backend command queue is full");
            Err(DispatchError::QueueFull)
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::warn!(
                command = cmd_name,
                %request,
                "backend command processor disconnected"
            );
            Err(DispatchError::WorkerGone)
        }
    }
}
