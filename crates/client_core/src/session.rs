use std::sync::Arc;

use shared::{domain::AuthUser, error::AuthError, protocol::Credentials};
use tokio::sync::watch;
use tracing::info;

use crate::{
    categories::DEFAULT_ERROR_MESSAGE,
    context::{publish_failure, AlertState, OperationContext, Outcome},
    AuthService,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<AuthUser>,
    pub has_error: bool,
    pub error_message: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            has_error: false,
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }
}

impl AlertState for SessionState {
    fn raise(&mut self, message: String) {
        self.has_error = true;
        self.error_message = message;
    }

    fn dismiss(&mut self) {
        self.has_error = false;
    }
}

fn validate_credentials(credentials: &Credentials) -> Result<(), AuthError> {
    let email = credentials.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AuthError::validation("Enter a valid email address."));
    }
    if credentials.password.is_empty() {
        return Err(AuthError::validation("Password must not be empty."));
    }
    Ok(())
}

/// Sign-in and registration forms. Input that fails validation never reaches
/// the service.
pub struct SessionController {
    service: Arc<dyn AuthService>,
    state: watch::Sender<SessionState>,
}

impl SessionController {
    pub fn new(service: Arc<dyn AuthService>) -> Arc<Self> {
        let (state, _) = watch::channel(SessionState::default());
        Arc::new(Self { service, state })
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub async fn sign_in(&self, credentials: Credentials) -> Outcome {
        if let Err(err) = validate_credentials(&credentials) {
            publish_failure(&self.state, OperationContext::SignIn, &err);
            return Outcome::Failed;
        }

        match self.service.sign_in(&credentials).await {
            Ok(user) => {
                info!(uid = %user.uid, "signed in");
                self.signed_in(user);
                Outcome::Completed
            }
            Err(err) => {
                publish_failure(&self.state, OperationContext::SignIn, &err);
                Outcome::Failed
            }
        }
    }

    pub async fn register(&self, credentials: Credentials, confirm_password: &str) -> Outcome {
        let validated = validate_credentials(&credentials).and_then(|()| {
            if credentials.password == confirm_password {
                Ok(())
            } else {
                Err(AuthError::validation("Passwords do not match."))
            }
        });
        if let Err(err) = validated {
            publish_failure(&self.state, OperationContext::Register, &err);
            return Outcome::Failed;
        }

        match self.service.create_user(&credentials).await {
            Ok(user) => {
                info!(uid = %user.uid, "registered account");
                self.signed_in(user);
                Outcome::Completed
            }
            Err(err) => {
                publish_failure(&self.state, OperationContext::Register, &err);
                Outcome::Failed
            }
        }
    }

    /// Forgets the current user after a completed log-out.
    pub fn signed_out(&self) {
        self.state.send_replace(SessionState::default());
    }

    pub fn dismiss_error(&self) {
        self.state.send_if_modified(|state| {
            let had_error = state.has_error;
            state.dismiss();
            had_error
        });
    }

    fn signed_in(&self, user: AuthUser) {
        self.state.send_replace(SessionState {
            user: Some(user),
            ..SessionState::default()
        });
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
