//! Create-acronym screen: loads users, holds the selection, validates and submits the form.

use std::time::{Duration, Instant};

use client_core::{ClientError, Outcome};
use shared::{domain::User, protocol::AcronymDraft};
use tracing::{debug, info, warn};

use crate::{
    backend_bridge::{
        commands::{BackendCommand, RequestId},
        runtime::BackendBridge,
        session::BridgeSession,
    },
    controller::{
        events::{
            build_draft, undelivered, UiEvent, WorkflowError, LOAD_USERS_FAILED_MESSAGE,
            NO_USERS_MESSAGE, SAVE_FAILED_MESSAGE,
        },
        select_user::{HandBack, SelectUserController},
    },
    presenter::{DismissAction, Presenter},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Loading,
    Ready { selection: User },
    Submitting { selection: User },
    Done,
    Failed,
}

/// Text last submitted from the form; kept across a rejected submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormText {
    pub short: String,
    pub long: String,
}

pub struct CreateAcronymController<P: Presenter> {
    session: BridgeSession,
    presenter: P,
    state: FlowState,
    form: FormText,
    pending: Option<RequestId>,
    pending_dismiss: Option<DismissAction>,
    last_error: Option<WorkflowError>,
    closed: bool,
}

impl<P: Presenter> CreateAcronymController<P> {
    pub fn new(bridge: &BackendBridge, presenter: P) -> Self {
        Self {
            session: bridge.session(),
            presenter,
            state: FlowState::Idle,
            form: FormText::default(),
            pending: None,
            pending_dismiss: None,
            last_error: None,
            closed: false,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn selection(&self) -> Option<&User> {
        match &self.state {
            FlowState::Ready { selection } | FlowState::Submitting { selection } => Some(selection),
            _ => None,
        }
    }

    pub fn form(&self) -> &FormText {
        &self.form
    }

    pub fn last_error(&self) -> Option<&WorkflowError> {
        self.last_error.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Screen appeared: start loading users.
    pub fn flow_entered(&mut self) {
        if self.closed || !matches!(self.state, FlowState::Idle | FlowState::Failed) {
            debug!(state = ?self.state, "ignoring flow entry");
            return;
        }
        self.state = FlowState::Loading;
        self.last_error = None;
        self.pending_dismiss = None;

        match self
            .session
            .dispatch(|request, reply| BackendCommand::FetchUsers { request, reply })
        {
            Ok(request) => self.pending = Some(request),
            Err(err) => self.on_users_loaded(Err(undelivered(err))),
        }
    }

    /// Applies every result that has already arrived. Call from the UI thread.
    pub fn process_ui_events(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.session.try_next() {
            if self.handle(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Blocks the caller until one result is applied or `timeout` elapses.
    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        while let Some(event) = self.session.next_before(deadline) {
            if self.handle(event) {
                return true;
            }
        }
        false
    }

    /// Form submit. Validation failures are presented and returned; nothing is sent for them.
    pub fn submit_requested(&mut self, short: &str, long: &str) -> Result<(), WorkflowError> {
        if self.closed || self.state == FlowState::Done {
            return Err(WorkflowError::FlowClosed);
        }
        if matches!(self.state, FlowState::Submitting { .. }) {
            debug!("submission already in flight");
            return Err(WorkflowError::SubmissionInFlight);
        }

        self.form = FormText {
            short: short.to_string(),
            long: long.to_string(),
        };

        let draft = match build_draft(short, long, self.selection()) {
            Ok(draft) => draft,
            Err(err) => {
                self.presenter.present_error(err.user_message(), None);
                return Err(err.into());
            }
        };

        if let FlowState::Ready { selection } = &self.state {
            self.state = FlowState::Submitting {
                selection: selection.clone(),
            };
        }
        self.last_error = None;
        self.submit(draft);
        Ok(())
    }

    /// Takes the value handed back by the user picker.
    pub fn apply_hand_back(&mut self, hand_back: HandBack) {
        let HandBack::Picked(user) = hand_back else {
            return;
        };
        match &mut self.state {
            FlowState::Ready { selection } => {
                info!(user_id = %user.id, "selection changed");
                *selection = user;
                self.presenter.display_selection(&selection.name);
            }
            state => debug!(?state, "ignoring picked user outside ready state"),
        }
    }

    /// Opens the user picker, marking the current selection.
    pub fn open_user_picker<Q: Presenter>(&self, presenter: Q) -> SelectUserController<Q> {
        SelectUserController::with_session(
            self.session.sibling(),
            presenter,
            self.selection().cloned(),
        )
    }

    pub fn error_dismissed(&mut self) {
        if let Some(DismissAction::ReturnToPriorScreen) = self.pending_dismiss.take() {
            self.close();
        }
    }

    /// User backed out. Anything still in flight is dropped when it lands.
    pub fn cancel(&mut self) {
        if !self.closed {
            self.close();
        }
    }

    fn close(&mut self) {
        self.session.detach();
        self.pending = None;
        self.closed = true;
        self.presenter.close_flow();
    }

    fn submit(&mut self, draft: AcronymDraft) {
        match self.session.dispatch(|request, reply| BackendCommand::CreateAcronym {
            request,
            draft,
            reply,
        }) {
            Ok(request) => self.pending = Some(request),
            Err(err) => self.on_acronym_saved(Err(undelivered(err))),
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
            UiEvent::AcronymSaved { outcome, .. } => self.on_acronym_saved(outcome),
        }
        true
    }

    fn on_users_loaded(&mut self, outcome: Outcome<Vec<User>>) {
        match outcome {
            Ok(users) => match users.into_iter().next() {
                Some(first) => {
                    self.presenter.display_selection(&first.name);
                    self.state = FlowState::Ready { selection: first };
                }
                None => {
                    warn!("user list is empty; no acronym owner available");
                    self.fail(WorkflowError::NoUsers, NO_USERS_MESSAGE);
                }
            },
            Err(err) => {
                log_remote_failure("fetch_users", &err);
                self.fail(WorkflowError::Remote(err), LOAD_USERS_FAILED_MESSAGE);
            }
        }
    }

    fn on_acronym_saved(&mut self, outcome: Outcome<()>) {
        let selection = match std::mem::replace(&mut self.state, FlowState::Done) {
            FlowState::Submitting { selection } => selection,
            other => {
                debug!(state = ?other, "save result outside submitting state");
                self.state = other;
                return;
            }
        };

        match outcome {
            Ok(()) => {
                info!(short = %self.form.short, "acronym saved");
                self.close();
            }
            Err(err) => {
                log_remote_failure("create_acronym", &err);
                self.state = FlowState::Ready { selection };
                self.last_error = Some(WorkflowError::Remote(err));
                self.presenter.present_error(SAVE_FAILED_MESSAGE, None);
            }
        }
    }

    fn fail(&mut self, err: WorkflowError, message: &str) {
        self.state = FlowState::Failed;
        self.last_error = Some(err);
        self.pending_dismiss = Some(DismissAction::ReturnToPriorScreen);
        self.presenter
            .present_error(message, Some(DismissAction::ReturnToPriorScreen));
    }
}

pub(crate) fn log_remote_failure(operation: &str, err: &ClientError) {
    warn!(
        operation,
        kind = err.kind().as_str(),
        status = ?err.status(),
        reason = ?err.reason(),
        error = %err,
        "remote operation failed"
    );
}
