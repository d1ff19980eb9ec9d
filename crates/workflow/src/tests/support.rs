use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use client_core::{ClientError, Outcome, ResourceClient};
use shared::{domain::User, protocol::AcronymDraft};

use crate::{
    backend_bridge::runtime::BackendBridge,
    presenter::{DismissAction, Presenter},
};

pub const WAIT: Duration = Duration::from_secs(5);

pub fn ray_and_vicki() -> Vec<User> {
    vec![User::new(1, "Ray"), User::new(2, "Vicki")]
}

/// Resource client replaying queued outcomes in order.
#[derive(Default)]
pub struct ScriptedClient {
    users: Mutex<VecDeque<Outcome<Vec<User>>>>,
    saves: Mutex<VecDeque<Outcome<()>>>,
    drafts: Mutex<Vec<AcronymDraft>>,
    fetch_calls: AtomicUsize,
    delay: Duration,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(self, outcome: Outcome<Vec<User>>) -> Self {
        self.users.lock().expect("users lock").push_back(outcome);
        self
    }

    pub fn with_save(self, outcome: Outcome<()>) -> Self {
        self.saves.lock().expect("saves lock").push_back(outcome);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn drafts(&self) -> Vec<AcronymDraft> {
        self.drafts.lock().expect("drafts lock").clone()
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl ResourceClient for ScriptedClient {
    async fn fetch_users(&self) -> Outcome<Vec<User>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.users
            .lock()
            .expect("users lock")
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Transport("no scripted user list".into())))
    }

    async fn create_acronym(&self, draft: &AcronymDraft) -> Outcome<()> {
        self.drafts.lock().expect("drafts lock").push(draft.clone());
        self.pause().await;
        self.saves
            .lock()
            .expect("saves lock")
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Transport("no scripted save".into())))
    }
}

pub fn launch(client: ScriptedClient) -> (BackendBridge, Arc<ScriptedClient>) {
    let client = Arc::new(client);
    let bridge = BackendBridge::launch(client.clone()).expect("launch bridge");
    (bridge, client)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterCall {
    Selection(String),
    UserList(Vec<String>),
    Error(String, Option<DismissAction>),
    Close,
}

/// Presenter recording every call; clones share one log.
#[derive(Clone, Default)]
pub struct RecordingPresenter {
    calls: Arc<Mutex<Vec<PresenterCall>>>,
}

impl RecordingPresenter {
    pub fn calls(&self) -> Vec<PresenterCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn last(&self) -> Option<PresenterCall> {
        self.calls().pop()
    }

    fn record(&self, call: PresenterCall) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

impl Presenter for RecordingPresenter {
    fn display_selection(&mut self, name: &str) {
        self.record(PresenterCall::Selection(name.to_string()));
    }

    fn display_user_list(&mut self, users: &[User]) {
        self.record(PresenterCall::UserList(
            users.iter().map(|u| u.name.clone()).collect(),
        ));
    }

    fn present_error(&mut self, message: &str, on_dismiss: Option<DismissAction>) {
        self.record(PresenterCall::Error(message.to_string(), on_dismiss));
    }

    fn close_flow(&mut self) {
        self.record(PresenterCall::Close);
    }
}
