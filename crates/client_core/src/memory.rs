//! In-process [`AuthService`] used by the terminal client and integration
//! tests. Accounts live only as long as the service value.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use shared::{
    domain::{AuthUser, Category, CategoryId, UserId},
    error::{AuthError, AuthErrorCode},
    protocol::Credentials,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::AuthService;

struct Account {
    user: AuthUser,
    password: String,
    categories: Vec<Category>,
}

#[derive(Default)]
struct InMemoryState {
    accounts: HashMap<String, Account>,
    session: Option<String>,
}

impl InMemoryState {
    fn session_account(&mut self) -> Result<&mut Account, AuthError> {
        let key = self.session.as_ref().ok_or_else(AuthError::not_signed_in)?;
        self.accounts
            .get_mut(key)
            .ok_or_else(AuthError::not_signed_in)
    }
}

#[derive(Default)]
pub struct InMemoryAuthService {
    inner: Mutex<InMemoryState>,
}

impl InMemoryAuthService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an account holding `categories` without signing it in.
    pub async fn seed_account(
        &self,
        credentials: &Credentials,
        categories: impl IntoIterator<Item = String>,
    ) -> Result<AuthUser, AuthError> {
        let mut guard = self.inner.lock().await;
        let key = credentials.account_key();
        if guard.accounts.contains_key(&key) {
            return Err(email_in_use());
        }

        let user = new_user(credentials);
        let categories = categories
            .into_iter()
            .map(|name| Category {
                id: CategoryId::generate(),
                name,
            })
            .collect::<Vec<_>>();
        debug!(uid = %user.uid, count = categories.len(), "seeded account");
        guard.accounts.insert(
            key,
            Account {
                user: user.clone(),
                password: credentials.password.clone(),
                categories,
            },
        );
        Ok(user)
    }

    pub async fn current_user(&self) -> Option<AuthUser> {
        let mut guard = self.inner.lock().await;
        guard.session_account().ok().map(|account| account.user.clone())
    }
}

fn new_user(credentials: &Credentials) -> AuthUser {
    AuthUser {
        uid: UserId::generate(),
        email: credentials.email.clone(),
        created_at: Utc::now(),
    }
}

fn email_in_use() -> AuthError {
    AuthError::new(
        AuthErrorCode::EmailAlreadyInUse,
        "The email address is already in use by another account.",
    )
}

#[async_trait]
impl AuthService for InMemoryAuthService {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthUser, AuthError> {
        let mut guard = self.inner.lock().await;
        let key = credentials.account_key();
        let user = match guard.accounts.get(&key) {
            Some(account) if account.password == credentials.password => account.user.clone(),
            _ => {
                return Err(AuthError::new(
                    AuthErrorCode::InvalidCredentials,
                    "The email or password is incorrect.",
                ))
            }
        };
        guard.session = Some(key);
        Ok(user)
    }

    async fn create_user(&self, credentials: &Credentials) -> Result<AuthUser, AuthError> {
        let mut guard = self.inner.lock().await;
        let key = credentials.account_key();
        if guard.accounts.contains_key(&key) {
            return Err(email_in_use());
        }

        let user = new_user(credentials);
        info!(uid = %user.uid, "created account");
        guard.accounts.insert(
            key.clone(),
            Account {
                user: user.clone(),
                password: credentials.password.clone(),
                categories: Vec::new(),
            },
        );
        guard.session = Some(key);
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.inner.lock().await.session = None;
        Ok(())
    }

    async fn delete_account(&self) -> Result<(), AuthError> {
        let mut guard = self.inner.lock().await;
        let key = guard.session.take().ok_or_else(AuthError::not_signed_in)?;
        guard.accounts.remove(&key);
        Ok(())
    }

    async fn get_categories(&self) -> Result<Vec<Category>, AuthError> {
        let mut guard = self.inner.lock().await;
        Ok(guard.session_account()?.categories.clone())
    }

    async fn add_category(&self, name: &str) -> Result<Category, AuthError> {
        let mut guard = self.inner.lock().await;
        let category = Category {
            id: CategoryId::generate(),
            name: name.to_string(),
        };
        guard.session_account()?.categories.push(category.clone());
        Ok(category)
    }

    async fn delete_category(&self, category: &Category) -> Result<(), AuthError> {
        let mut guard = self.inner.lock().await;
        let account = guard.session_account()?;
        let before = account.categories.len();
        account.categories.retain(|existing| existing.id != category.id);
        if account.categories.len() == before {
            return Err(AuthError::new(
                AuthErrorCode::NotFound,
                format!("Category '{}' no longer exists.", category.name),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/memory_tests.rs"]
mod tests;
