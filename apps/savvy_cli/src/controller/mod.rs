//! Controller layer: UI events and the controllers the front end drives.

use std::sync::Arc;

use client_core::{AuthService, CategoryStateController, SessionController};

pub mod events;

/// Both screens' controllers, sharing one service.
#[derive(Clone)]
pub struct Controllers {
    pub session: Arc<SessionController>,
    pub categories: Arc<CategoryStateController>,
}

impl Controllers {
    pub fn new(service: Arc<dyn AuthService>) -> Self {
        Self {
            session: SessionController::new(service.clone()),
            categories: CategoryStateController::new(service),
        }
    }
}
