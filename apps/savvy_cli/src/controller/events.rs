//! Backend-to-UI events.

use client_core::{ControllerState, SessionState};

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    CategoriesChanged(ControllerState),
    SessionChanged(SessionState),
    BackendStopped(String),
}
