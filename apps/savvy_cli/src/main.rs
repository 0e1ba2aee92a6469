use std::{
    io::{self, BufRead},
    path::PathBuf,
    sync::Arc,
    thread,
};

use anyhow::Result;
use clap::Parser;
use client_core::InMemoryAuthService;
use crossbeam_channel::{bounded, never, select, unbounded, Receiver};
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod config;
mod controller;
mod ui;

use config::load_settings;
use controller::Controllers;
use ui::app::{Flow, TerminalApp};

#[derive(Parser, Debug)]
#[command(name = "savvy-snip", about = "Terminal client for Savvy-Snip accounts and categories")]
struct Args {
    /// TOML settings file; missing files fall back to defaults.
    #[arg(long, default_value = "savvy_snip.toml")]
    config: PathBuf,
    /// Overrides the configured tracing filter.
    #[arg(long)]
    log_filter: Option<String>,
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (line_tx, line_rx) = unbounded();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });
    line_rx
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(&args.config);
    if let Some(filter) = args.log_filter {
        settings.log_filter = filter;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    tracing::info!(config = %args.config.display(), "starting savvy-snip");

    let service = Arc::new(InMemoryAuthService::new());
    let controllers = Controllers::new(service.clone());
    let (cmd_tx, cmd_rx) = bounded(settings.command_queue_capacity);
    let (ui_tx, ui_rx) = unbounded();
    let backend = backend_bridge::runtime::launch(
        cmd_rx,
        ui_tx,
        service,
        settings.demo_account(),
        controllers.clone(),
    );

    let lines = spawn_stdin_reader();
    let input_closed = never();
    let mut input_open = true;
    let mut app = TerminalApp::new(controllers, cmd_tx, io::stdout());
    app.write_help()?;

    // Once input ends, keep rendering until the worker has finished what was
    // queued and dropped its UI sender.
    loop {
        let input = if input_open { &lines } else { &input_closed };
        select! {
            recv(input) -> line => match line {
                Ok(line) => {
                    if app.handle_line(&line)? == Flow::Quit {
                        break;
                    }
                }
                Err(_) => {
                    tracing::debug!("input closed; waiting for backend worker");
                    app.close_commands();
                    input_open = false;
                }
            },
            recv(ui_rx) -> event => match event {
                Ok(event) => app.handle_event(event)?,
                Err(_) => break,
            },
        }
    }

    // Dropping the app closes the command queue, which stops the worker.
    drop(app);
    if backend.join().is_err() {
        tracing::error!("backend worker panicked");
    }
    Ok(())
}
