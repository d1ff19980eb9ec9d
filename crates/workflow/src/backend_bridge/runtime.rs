//! Backend worker: a dedicated thread owning the tokio runtime that performs remote calls.

use std::{sync::Arc, thread};

use client_core::ResourceClient;
use crossbeam_channel::{bounded, Receiver, Sender};
use tokio::runtime::Runtime;

use crate::{
    backend_bridge::{commands::BackendCommand, session::BridgeSession, BridgeError},
    controller::events::UiEvent,
};

const COMMAND_QUEUE_DEPTH: usize = 64;

/// Handle to the backend worker. Cloning shares the same worker.
#[derive(Clone)]
pub struct BackendBridge {
    cmd_tx: Sender<BackendCommand>,
}

impl BackendBridge {
    /// Starts the worker thread. It exits once the bridge and every session are dropped.
    pub fn launch(client: Arc<dyn ResourceClient>) -> Result<Self, BridgeError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(BridgeError::Runtime)?;
        let (cmd_tx, cmd_rx) = bounded(COMMAND_QUEUE_DEPTH);

        thread::Builder::new()
            .name("acronyms-backend".into())
            .spawn(move || run_worker(runtime, cmd_rx, client))
            .map_err(BridgeError::Thread)?;

        Ok(Self { cmd_tx })
    }

    #[cfg(test)]
    pub(crate) fn from_sender(cmd_tx: Sender<BackendCommand>) -> Self {
        Self { cmd_tx }
    }

    /// Opens a reply channel for one screen.
    pub fn session(&self) -> BridgeSession {
        BridgeSession::new(self.cmd_tx.clone())
    }
}

fn run_worker(runtime: Runtime, cmd_rx: Receiver<BackendCommand>, client: Arc<dyn ResourceClient>) {
    tracing::debug!("backend worker ready");
    while let Ok(cmd) = cmd_rx.recv() {
        runtime.spawn(execute(Arc::clone(&client), cmd));
    }
    tracing::debug!("backend worker stopping; all senders dropped");
}

/// Runs one command and delivers exactly one result for it.
async fn execute(client: Arc<dyn ResourceClient>, cmd: BackendCommand) {
    match cmd {
        BackendCommand::FetchUsers { request, reply } => {
            let outcome = client.fetch_users().await;
            reply.deliver(UiEvent::UsersLoaded { request, outcome });
        }
        BackendCommand::CreateAcronym {
            request,
            draft,
            reply,
        } => {
            let outcome = client.create_acronym(&draft).await;
            reply.deliver(UiEvent::AcronymSaved { request, outcome });
        }
    }
}
