//! User picker screen. Loads the user list and hands the chosen user back to its opener.

use std::time::{Duration, Instant};

use client_core::Outcome;
use shared::domain::User;
use tracing::{debug, warn};

use crate::{
    backend_bridge::{
        commands::{BackendCommand, RequestId},
        runtime::BackendBridge,
        session::BridgeSession,
    },
    controller::{
        create_acronym::log_remote_failure,
        events::{undelivered, UiEvent, LOAD_USERS_FAILED_MESSAGE},
    },
    presenter::{DismissAction, Presenter},
};

/// Value the picker returns when it ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandBack {
    Picked(User),
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerState {
    Idle,
    Loading,
    Loaded,
    Failed,
}

pub struct SelectUserController<P: Presenter> {
    session: BridgeSession,
    presenter: P,
    state: PickerState,
    users: Vec<User>,
    current: Option<User>,
    pending: Option<RequestId>,
    pending_dismiss: Option<DismissAction>,
    closed: bool,
}

impl<P: Presenter> SelectUserController<P> {
    pub fn new(bridge: &BackendBridge, presenter: P, current: Option<User>) -> Self {
        Self::with_session(bridge.session(), presenter, current)
    }

    pub(crate) fn with_session(
        session: BridgeSession,
        presenter: P,
        current: Option<User>,
    ) -> Self {
        Self {
            session,
            presenter,
            state: PickerState::Idle,
            users: Vec::new(),
            current,
            pending: None,
            pending_dismiss: None,
            closed: false,
        }
    }

    pub fn state(&self) -> PickerState {
        self.state
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn user_at(&self, index: usize) -> Option<&User> {
        self.users.get(index)
    }

    /// Whether `user` is the selection the picker was opened with.
    pub fn is_current(&self, user: &User) -> bool {
        self.current.as_ref().is_some_and(|current| current.id == user.id)
    }

    pub fn flow_entered(&mut self) {
        if self.closed || !matches!(self.state, PickerState::Idle | PickerState::Failed) {
            debug!(state = ?self.state, "ignoring picker entry");
            return;
        }
        self.state = PickerState::Loading;
        self.pending_dismiss = None;

        match self
            .session
            .dispatch(|request, reply| BackendCommand::FetchUsers { request, reply })
        {
            Ok(request) => self.pending = Some(request),
            Err(err) => self.on_users_loaded(Err(undelivered(err))),
        }
    }

    pub fn process_ui_events(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.session.try_next() {
            if self.handle(event) {
                applied += 1;
            }
        }
        applied
    }

    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        while let Some(event) = self.session.next_before(deadline) {
            if self.handle(event) {
                return true;
            }
        }
        false
    }

    /// Ends the picker with the user at `index`. An unknown index hands back nothing.
    pub fn user_picked(mut self, index: usize) -> HandBack {
        let hand_back = match self.users.get(index) {
            Some(user) => HandBack::Picked(user.clone()),
            None => {
                warn!(index, count = self.users.len(), "picked index out of range");
                HandBack::Unchanged
            }
        };
        self.session.detach();
        self.presenter.close_flow();
        hand_back
    }

    /// Ends the picker without a choice; the opener keeps its selection.
    pub fn abandon(self) -> HandBack {
        HandBack::Unchanged
    }

    pub fn error_dismissed(&mut self) {
        if let Some(DismissAction::ReturnToPriorScreen) = self.pending_dismiss.take() {
            self.session.detach();
            self.pending = None;
            self.closed = true;
            self.presenter.close_flow();
        }
    }

    fn handle(&mut self, event: UiEvent) -> bool {
        let request = event.request();
        if self.closed || self.pending != Some(request) {
            debug!(%request, "dropping stale result");
            return false;
        }
        self.pending = None;

        match event {
            UiEvent::UsersLoaded { outcome, .. } => self.on_users_loaded(outcome),
            UiEvent::AcronymSaved { .. } => {
                debug!(%request, "picker never submits acronyms; ignoring save result");
                return false;
            }
        }
        true
    }

    fn on_users_loaded(&mut self, outcome: Outcome<Vec<User>>) {
        match outcome {
            Ok(users) => {
                self.users = users;
                self.state = PickerState::Loaded;
                self.presenter.display_user_list(&self.users);
            }
            Err(err) => {
                log_remote_failure("fetch_users", &err);
                self.state = PickerState::Failed;
                self.pending_dismiss = Some(DismissAction::ReturnToPriorScreen);
                self.presenter.present_error(
                    LOAD_USERS_FAILED_MESSAGE,
                    Some(DismissAction::ReturnToPriorScreen),
                );
            }
        }
    }
}
