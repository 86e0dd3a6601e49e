//! Controller layer: UI events, keyboard mapping, calculator session state and
//! command orchestration.

pub mod events;
pub mod keymap;
pub mod orchestration;
pub mod session;
