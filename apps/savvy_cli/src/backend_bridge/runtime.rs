//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{CategoryStateController, InMemoryAuthService, SessionController};
use crossbeam_channel::{Receiver, Sender};
use shared::{domain::UserId, protocol::Credentials};
use tokio::{sync::watch, task::JoinSet};

use crate::{
    backend_bridge::commands::BackendCommand,
    config::DemoAccount,
    controller::{events::UiEvent, Controllers},
};

/// Runs queued commands on a tokio runtime owned by a dedicated thread until
/// the UI drops its command sender. Commands already running when the queue
/// closes are awaited, and the final state of both controllers is sent before
/// the worker drops its UI sender.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    service: Arc<InMemoryAuthService>,
    demo_account: Option<DemoAccount>,
    controllers: Controllers,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.send(UiEvent::BackendStopped(format!(
                    "backend worker startup failure: {err}"
                )));
                return;
            }
        };

        if let Some(demo) = demo_account {
            let seeded = runtime.block_on(service.seed_account(&demo.credentials, demo.categories));
            match seeded {
                Ok(user) => {
                    tracing::info!(uid = %user.uid, "seeded demo account");
                    let _ = ui_tx.send(UiEvent::Info(format!(
                        "Demo account {} is ready",
                        user.email
                    )));
                }
                Err(err) => tracing::warn!("could not seed demo account: {err}"),
            }
        }

        let forwarders = [
            runtime.spawn(forward_changes(
                controllers.categories.subscribe(),
                ui_tx.clone(),
                UiEvent::CategoriesChanged,
            )),
            runtime.spawn(forward_changes(
                controllers.session.subscribe(),
                ui_tx.clone(),
                UiEvent::SessionChanged,
            )),
        ];
        let _ = ui_tx.send(UiEvent::Info("Backend worker ready".to_string()));

        let mut in_flight = JoinSet::new();
        while let Ok(cmd) = cmd_rx.recv() {
            tracing::debug!(command = cmd.name(), "running backend command");
            in_flight.spawn_on(run_command(cmd, controllers.clone()), runtime.handle());
            while let Some(finished) = in_flight.try_join_next() {
                log_failed_task(finished);
            }
        }

        tracing::debug!(
            pending = in_flight.len(),
            "command queue closed; finishing in-flight commands"
        );
        runtime.block_on(async {
            while let Some(finished) = in_flight.join_next().await {
                log_failed_task(finished);
            }
            for forwarder in forwarders {
                forwarder.abort();
                let _ = forwarder.await;
            }
        });

        let _ = ui_tx.send(UiEvent::CategoriesChanged(controllers.categories.snapshot()));
        let _ = ui_tx.send(UiEvent::SessionChanged(controllers.session.snapshot()));
        tracing::debug!("backend worker stopped");
    })
}

fn log_failed_task(finished: Result<(), tokio::task::JoinError>) {
    if let Err(err) = finished {
        tracing::error!("backend command task failed: {err}");
    }
}

/// Hands every published state to the UI thread, which is the only place
/// that renders.
async fn forward_changes<T: Clone + Send + Sync + 'static>(
    mut rx: watch::Receiver<T>,
    ui_tx: Sender<UiEvent>,
    wrap: fn(T) -> UiEvent,
) {
    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();
        if ui_tx.send(wrap(state)).is_err() {
            break;
        }
    }
}

/// One UI action. Commands run independently of each other; nothing orders
/// their completions.
pub(crate) async fn run_command(cmd: BackendCommand, controllers: Controllers) {
    let Controllers {
        session,
        categories,
    } = controllers;

    match cmd {
        BackendCommand::Register {
            email,
            password,
            confirm_password,
        } => {
            let previous = signed_in_uid(&session);
            let outcome = session
                .register(Credentials::new(email, password), &confirm_password)
                .await;
            if outcome.is_completed() {
                load_categories_for_session(&session, &categories, previous).await;
            }
        }
        BackendCommand::SignIn { email, password } => {
            let previous = signed_in_uid(&session);
            if session
                .sign_in(Credentials::new(email, password))
                .await
                .is_completed()
            {
                load_categories_for_session(&session, &categories, previous).await;
            }
        }
        BackendCommand::FetchCategories => categories.fetch_categories().await,
        BackendCommand::AddCategory { name } => categories.add_category(&name).await,
        BackendCommand::DeleteCategory { position } => {
            categories.delete_category(position).await
        }
        BackendCommand::LogOut => {
            if categories.log_out().await.is_completed() {
                session.signed_out();
            }
        }
        BackendCommand::DeleteAccount => {
            // A deleted account is always followed by a forced log-out.
            if categories.delete_account().await.is_completed()
                && categories.log_out().await.is_completed()
            {
                session.signed_out();
            }
        }
    }
}

fn signed_in_uid(session: &SessionController) -> Option<UserId> {
    session.snapshot().user.map(|user| user.uid)
}

/// Another account must not see the previous account's list, even when its
/// own first fetch fails.
async fn load_categories_for_session(
    session: &SessionController,
    categories: &CategoryStateController,
    previous: Option<UserId>,
) {
    let current = signed_in_uid(session);
    if current != previous {
        tracing::debug!("signed-in account changed; clearing categories");
        categories.reset();
    }
    categories.fetch_categories().await;
}

#[cfg(test)]
#[path = "../tests/runtime_tests.rs"]
mod tests;
