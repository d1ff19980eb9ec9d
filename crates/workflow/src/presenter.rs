//! Contract the presentation layer implements; controllers only ever call these.

use shared::domain::User;

/// What dismissing an error prompt should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissAction {
    ReturnToPriorScreen,
}

pub trait Presenter {
    fn display_selection(&mut self, name: &str);
    fn display_user_list(&mut self, users: &[User]);
    /// When `on_dismiss` is set the presentation must report the dismissal back
    /// through the controller's `error_dismissed`.
    fn present_error(&mut self, message: &str, on_dismiss: Option<DismissAction>);
    fn close_flow(&mut self);
}
