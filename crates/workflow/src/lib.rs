//! Create-acronym workflow: the form controller, the user picker, and the
//! bridge that runs their remote calls off the UI thread.

pub mod backend_bridge;
pub mod controller;
pub mod presenter;

pub use backend_bridge::{runtime::BackendBridge, BridgeError};
pub use controller::{
    create_acronym::{CreateAcronymController, FlowState},
    events::{ValidationError, WorkflowError},
    select_user::{HandBack, PickerState, SelectUserController},
};
pub use presenter::{DismissAction, Presenter};

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;
