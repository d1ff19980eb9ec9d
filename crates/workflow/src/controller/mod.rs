//! Controller layer: completion events, the two screen controllers, and command orchestration.

pub mod create_acronym;
pub mod events;
pub mod orchestration;
pub mod select_user;
