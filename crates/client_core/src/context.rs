//! Operation taxonomy and the error surface shared by the controllers.

use shared::error::AuthError;
use tokio::sync::watch;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationContext {
    SignIn,
    Register,
    SignOut,
    DeleteAccount,
    FetchCategories,
    AddCategory,
    DeleteCategory,
}

impl OperationContext {
    pub fn name(self) -> &'static str {
        match self {
            Self::SignIn => "sign_in",
            Self::Register => "register",
            Self::SignOut => "sign_out",
            Self::DeleteAccount => "delete_account",
            Self::FetchCategories => "fetch_categories",
            Self::AddCategory => "add_category",
            Self::DeleteCategory => "delete_category",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Self::SignIn => "Error signing in",
            Self::Register => "Error creating account",
            Self::SignOut => "Error signing out",
            Self::DeleteAccount => "Error deleting account",
            Self::FetchCategories => "Error fetching categories",
            Self::AddCategory => "Error adding category",
            Self::DeleteCategory => "Error deleting category",
        }
    }

    pub fn describe(self, err: &AuthError) -> String {
        format!("{}: {err}", self.prefix())
    }
}

/// What the invoker of a navigation-relevant operation gets back. Failure
/// details are only ever published through controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Failed,
}

impl Outcome {
    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }
}

/// Published state that carries an alert (`has_error` + `error_message`).
pub trait AlertState {
    fn raise(&mut self, message: String);
    fn dismiss(&mut self);
}

/// Converts a service failure into the alert pair in a single publish.
pub(crate) fn publish_failure<S: AlertState>(
    state: &watch::Sender<S>,
    context: OperationContext,
    err: &AuthError,
) {
    let message = context.describe(err);
    error!(operation = context.name(), code = ?err.code, "{message}");
    state.send_modify(|state| state.raise(message));
}
