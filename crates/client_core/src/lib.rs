//! Client core for Savvy-Snip: the authentication-service contract and the
//! controllers that turn UI actions into service calls and published state.

use async_trait::async_trait;
use shared::{
    domain::{AuthUser, Category},
    error::AuthError,
    protocol::Credentials,
};

mod categories;
mod context;
mod memory;
mod session;

pub use categories::{
    filter_categories, CategoryStateController, ControllerState, DEFAULT_ERROR_MESSAGE,
};
pub use context::{AlertState, OperationContext, Outcome};
pub use memory::InMemoryAuthService;
pub use session::{SessionController, SessionState};

/// Backend that owns accounts and their categories.
///
/// Every call is a single attempt; implementations decide how long a call may
/// take and callers never cancel one.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthUser, AuthError>;
    async fn create_user(&self, credentials: &Credentials) -> Result<AuthUser, AuthError>;
    async fn sign_out(&self) -> Result<(), AuthError>;
    async fn delete_account(&self) -> Result<(), AuthError>;
    async fn get_categories(&self) -> Result<Vec<Category>, AuthError>;
    async fn add_category(&self, name: &str) -> Result<Category, AuthError>;
    async fn delete_category(&self, category: &Category) -> Result<(), AuthError>;
}

#[cfg(test)]
#[path = "tests/scripted_service.rs"]
mod scripted_service;
