use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use client_core::AuthService;
use crossbeam_channel::{bounded, unbounded, TryRecvError};
use shared::{
    domain::{AuthUser, Category},
    error::{AuthError, AuthErrorCode},
};

use super::*;

/// In-memory service whose category fetches can be switched to fail.
struct FlakyFetchService {
    inner: InMemoryAuthService,
    fail_fetch: AtomicBool,
}

#[async_trait]
impl AuthService for FlakyFetchService {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthUser, AuthError> {
        self.inner.sign_in(credentials).await
    }

    async fn create_user(&self, credentials: &Credentials) -> Result<AuthUser, AuthError> {
        self.inner.create_user(credentials).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.inner.sign_out().await
    }

    async fn delete_account(&self) -> Result<(), AuthError> {
        self.inner.delete_account().await
    }

    async fn get_categories(&self) -> Result<Vec<Category>, AuthError> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(AuthError::new(AuthErrorCode::Unavailable, "service offline"));
        }
        self.inner.get_categories().await
    }

    async fn add_category(&self, name: &str) -> Result<Category, AuthError> {
        self.inner.add_category(name).await
    }

    async fn delete_category(&self, category: &Category) -> Result<(), AuthError> {
        self.inner.delete_category(category).await
    }
}

fn sign_in_as(email: &str, password: &str) -> BackendCommand {
    BackendCommand::SignIn {
        email: email.to_string(),
        password: password.to_string(),
    }
}

fn demo() -> Credentials {
    Credentials::new("demo@savvysnip.app", "snip")
}

async fn signed_in_controllers() -> (Arc<InMemoryAuthService>, Controllers) {
    let service = Arc::new(InMemoryAuthService::new());
    service
        .seed_account(&demo(), ["Recipes".to_string(), "Travel".to_string()])
        .await
        .expect("seed");
    let controllers = Controllers::new(service.clone());
    run_command(
        BackendCommand::SignIn {
            email: "demo@savvysnip.app".to_string(),
            password: "snip".to_string(),
        },
        controllers.clone(),
    )
    .await;
    (service, controllers)
}

fn category_names(controllers: &Controllers) -> Vec<String> {
    controllers
        .categories
        .snapshot()
        .categories
        .into_iter()
        .map(|category| category.name)
        .collect()
}

#[tokio::test]
async fn sign_in_loads_categories() {
    let (_, controllers) = signed_in_controllers().await;

    assert!(controllers.session.snapshot().user.is_some());
    assert_eq!(category_names(&controllers), vec!["Recipes", "Travel"]);
}

#[tokio::test]
async fn failed_sign_in_does_not_fetch() {
    let service = Arc::new(InMemoryAuthService::new());
    let controllers = Controllers::new(service);

    run_command(
        BackendCommand::SignIn {
            email: "nobody@savvysnip.app".to_string(),
            password: "x".to_string(),
        },
        controllers.clone(),
    )
    .await;

    assert!(controllers.session.snapshot().has_error);
    assert!(!controllers.categories.snapshot().has_error);
}

#[tokio::test]
async fn register_then_add_category() {
    let controllers = Controllers::new(Arc::new(InMemoryAuthService::new()));

    run_command(
        BackendCommand::Register {
            email: "new@savvysnip.app".to_string(),
            password: "pw".to_string(),
            confirm_password: "pw".to_string(),
        },
        controllers.clone(),
    )
    .await;
    run_command(
        BackendCommand::AddCategory {
            name: "Ideas".to_string(),
        },
        controllers.clone(),
    )
    .await;

    assert_eq!(category_names(&controllers), vec!["Ideas"]);
}

#[tokio::test]
async fn delete_account_forces_log_out() {
    let (service, controllers) = signed_in_controllers().await;

    run_command(BackendCommand::DeleteAccount, controllers.clone()).await;

    assert!(service.current_user().await.is_none());
    assert!(controllers.categories.snapshot().categories.is_empty());
    assert!(!controllers.categories.snapshot().has_error);
    assert!(controllers.session.snapshot().user.is_none());
}

#[tokio::test]
async fn log_out_clears_both_screens() {
    let (_, controllers) = signed_in_controllers().await;

    run_command(BackendCommand::LogOut, controllers.clone()).await;

    assert!(controllers.categories.snapshot().categories.is_empty());
    assert!(controllers.session.snapshot().user.is_none());
}

#[test]
fn launched_worker_forwards_state_changes() {
    let service = Arc::new(InMemoryAuthService::new());
    let controllers = Controllers::new(service.clone());
    let (cmd_tx, cmd_rx) = bounded(8);
    let (ui_tx, ui_rx) = unbounded();
    let demo_account = DemoAccount {
        credentials: demo(),
        categories: vec!["Recipes".to_string()],
    };

    let worker = launch(cmd_rx, ui_tx, service, Some(demo_account), controllers);
    cmd_tx
        .send(BackendCommand::SignIn {
            email: "demo@savvysnip.app".to_string(),
            password: "snip".to_string(),
        })
        .expect("queue sign in");

    let mut saw_categories = false;
    while let Ok(event) = ui_rx.recv_timeout(Duration::from_secs(5)) {
        if let UiEvent::CategoriesChanged(state) = event {
            if state.categories.len() == 1 {
                saw_categories = true;
                break;
            }
        }
    }
    assert!(saw_categories, "expected forwarded category state");

    drop(cmd_tx);
    worker.join().expect("worker exits once the queue closes");
}

#[tokio::test]
async fn switching_account_drops_previous_categories_even_if_fetch_fails() {
    let service = Arc::new(FlakyFetchService {
        inner: InMemoryAuthService::new(),
        fail_fetch: AtomicBool::new(false),
    });
    let other = Credentials::new("other@savvysnip.app", "pw");
    service
        .inner
        .seed_account(&demo(), ["Recipes".to_string()])
        .await
        .expect("seed demo");
    service
        .inner
        .seed_account(&other, ["Taxes".to_string()])
        .await
        .expect("seed other");
    let controllers = Controllers::new(service.clone());

    run_command(sign_in_as("demo@savvysnip.app", "snip"), controllers.clone()).await;
    assert_eq!(category_names(&controllers), vec!["Recipes"]);

    service.fail_fetch.store(true, Ordering::SeqCst);
    run_command(sign_in_as("other@savvysnip.app", "pw"), controllers.clone()).await;

    let state = controllers.categories.snapshot();
    assert_eq!(
        controllers.session.snapshot().user.map(|user| user.email),
        Some("other@savvysnip.app".to_string())
    );
    assert!(state.categories.is_empty());
    assert!(state.has_error);
    assert_eq!(state.error_message, "Error fetching categories: service offline");
}

#[tokio::test]
async fn signing_in_again_as_same_account_keeps_list_on_failed_fetch() {
    let service = Arc::new(FlakyFetchService {
        inner: InMemoryAuthService::new(),
        fail_fetch: AtomicBool::new(false),
    });
    service
        .inner
        .seed_account(&demo(), ["Recipes".to_string()])
        .await
        .expect("seed demo");
    let controllers = Controllers::new(service.clone());

    run_command(sign_in_as("demo@savvysnip.app", "snip"), controllers.clone()).await;
    service.fail_fetch.store(true, Ordering::SeqCst);
    run_command(sign_in_as("demo@savvysnip.app", "snip"), controllers.clone()).await;

    assert_eq!(category_names(&controllers), vec!["Recipes"]);
    assert!(controllers.categories.snapshot().has_error);
}

#[test]
fn closing_queue_waits_for_in_flight_commands() {
    let service = Arc::new(InMemoryAuthService::new());
    let controllers = Controllers::new(service.clone());
    let (cmd_tx, cmd_rx) = bounded(8);
    let (ui_tx, ui_rx) = unbounded();
    let demo_account = DemoAccount {
        credentials: demo(),
        categories: vec!["Recipes".to_string(), "Travel".to_string()],
    };

    let worker = launch(cmd_rx, ui_tx, service, Some(demo_account), controllers);
    cmd_tx
        .send(sign_in_as("demo@savvysnip.app", "snip"))
        .expect("queue sign in");
    drop(cmd_tx);

    let mut last_categories = None;
    let mut last_session = None;
    while let Ok(event) = ui_rx.recv_timeout(Duration::from_secs(5)) {
        match event {
            UiEvent::CategoriesChanged(state) => last_categories = Some(state),
            UiEvent::SessionChanged(state) => last_session = Some(state),
            _ => {}
        }
    }
    assert_eq!(ui_rx.try_recv().unwrap_err(), TryRecvError::Disconnected);
    worker.join().expect("worker exits once the queue closes");

    let names = last_categories
        .expect("final category state")
        .categories
        .into_iter()
        .map(|category| category.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Recipes", "Travel"]);
    assert!(last_session.expect("final session state").user.is_some());
}
