use std::sync::Arc;

use shared::domain::Category;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::{
    context::{publish_failure, AlertState, OperationContext, Outcome},
    AuthService,
};

pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

/// Everything the category screen renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerState {
    pub categories: Vec<Category>,
    pub has_error: bool,
    pub error_message: String,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            has_error: false,
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }
}

impl AlertState for ControllerState {
    fn raise(&mut self, message: String) {
        self.has_error = true;
        self.error_message = message;
    }

    fn dismiss(&mut self) {
        self.has_error = false;
    }
}

/// Categories whose name contains `search_text`, ignoring case, in their
/// original order. An empty search matches everything.
pub fn filter_categories(categories: &[Category], search_text: &str) -> Vec<Category> {
    if search_text.is_empty() {
        return categories.to_vec();
    }

    let needle = search_text.to_lowercase();
    categories
        .iter()
        .filter(|category| category.name_contains_lowercase(&needle))
        .cloned()
        .collect()
}

/// Owns the category list and its alert, and absorbs every service failure
/// into that state. Nothing here returns an error to the caller.
///
/// Operations issued back to back are not ordered against each other. Each
/// mutation after a successful delete or add comes from a full re-fetch, so
/// the list converges on the service's view whichever completion lands last.
pub struct CategoryStateController {
    service: Arc<dyn AuthService>,
    state: watch::Sender<ControllerState>,
}

impl CategoryStateController {
    pub fn new(service: Arc<dyn AuthService>) -> Arc<Self> {
        let (state, _) = watch::channel(ControllerState::default());
        Arc::new(Self { service, state })
    }

    pub fn subscribe(&self) -> watch::Receiver<ControllerState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ControllerState {
        self.state.borrow().clone()
    }

    pub async fn fetch_categories(&self) {
        match self.service.get_categories().await {
            Ok(categories) => {
                debug!(count = categories.len(), "fetched categories");
                self.state.send_modify(|state| state.categories = categories);
            }
            Err(err) => publish_failure(&self.state, OperationContext::FetchCategories, &err),
        }
    }

    /// `position` is resolved against the list as it is right now; a stale
    /// index from the UI is ignored.
    pub async fn delete_category(&self, position: usize) {
        let category = self.state.borrow().categories.get(position).cloned();
        let Some(category) = category else {
            debug!(position, "ignoring delete for out-of-range category index");
            return;
        };

        match self.service.delete_category(&category).await {
            Ok(()) => {
                info!(category_id = %category.id, "deleted category");
                self.fetch_categories().await;
            }
            Err(err) => publish_failure(&self.state, OperationContext::DeleteCategory, &err),
        }
    }

    pub async fn add_category(&self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            debug!("ignoring add for blank category name");
            return;
        }

        match self.service.add_category(name).await {
            Ok(category) => {
                info!(category_id = %category.id, "added category");
                self.fetch_categories().await;
            }
            Err(err) => publish_failure(&self.state, OperationContext::AddCategory, &err),
        }
    }

    pub async fn log_out(&self) -> Outcome {
        match self.service.sign_out().await {
            Ok(()) => {
                info!("signed out");
                self.reset();
                Outcome::Completed
            }
            Err(err) => {
                publish_failure(&self.state, OperationContext::SignOut, &err);
                Outcome::Failed
            }
        }
    }

    /// Deleting the account leaves state alone. On [`Outcome::Completed`]
    /// the caller must follow up with [`Self::log_out`].
    pub async fn delete_account(&self) -> Outcome {
        match self.service.delete_account().await {
            Ok(()) => {
                info!("deleted account");
                Outcome::Completed
            }
            Err(err) => {
                publish_failure(&self.state, OperationContext::DeleteAccount, &err);
                Outcome::Failed
            }
        }
    }

    pub fn filtered_categories(&self, search_text: &str) -> Vec<Category> {
        filter_categories(&self.state.borrow().categories, search_text)
    }

    pub fn reset(&self) {
        self.state.send_replace(ControllerState::default());
    }

    pub fn dismiss_error(&self) {
        self.state.send_if_modified(|state| {
            let had_error = state.has_error;
            state.dismiss();
            had_error
        });
    }
}

#[cfg(test)]
#[path = "tests/categories_tests.rs"]
mod tests;
