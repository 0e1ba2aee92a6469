use std::io::Write;

use anyhow::{Context, Result};
use client_core::{filter_categories, ControllerState, SessionState};
use crossbeam_channel::{Sender, TrySendError};
use shared::domain::Category;
use tracing::{debug, warn};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{events::UiEvent, Controllers},
    ui::{
        input::{parse_input, Input, HELP},
        render::{render_alerts, render_categories, render_session},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// UI-thread state. Controller state only arrives here as snapshots carried
/// by [`UiEvent`]s; the app never writes it except through the controllers.
pub struct TerminalApp<W: Write> {
    controllers: Controllers,
    /// `None` once input has ended; the worker drains what is already queued.
    cmd_tx: Option<Sender<BackendCommand>>,
    out: W,
    categories: ControllerState,
    session: SessionState,
    search_text: String,
}

impl<W: Write> TerminalApp<W> {
    pub fn new(controllers: Controllers, cmd_tx: Sender<BackendCommand>, out: W) -> Self {
        let categories = controllers.categories.snapshot();
        let session = controllers.session.snapshot();
        Self {
            controllers,
            cmd_tx: Some(cmd_tx),
            out,
            categories,
            session,
            search_text: String::new(),
        }
    }

    pub fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let input = match parse_input(line) {
            Ok(input) => input,
            Err(usage) => {
                self.write_line(&usage)?;
                return Ok(Flow::Continue);
            }
        };

        match input {
            Input::Backend(cmd) => self.dispatch(cmd)?,
            Input::DeleteRow(row) => self.delete_row(row)?,
            Input::Search(text) => {
                self.search_text = text;
                self.redraw()?;
            }
            Input::Show => self.redraw()?,
            Input::Json => {
                let json = serde_json::to_string_pretty(&self.visible_categories())
                    .context("failed to encode categories as JSON")?;
                self.write_line(&json)?;
            }
            Input::Dismiss => {
                self.controllers.session.dismiss_error();
                self.controllers.categories.dismiss_error();
            }
            Input::Help => self.write_line(HELP)?,
            Input::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    pub fn handle_event(&mut self, event: UiEvent) -> Result<()> {
        match event {
            UiEvent::Info(message) => self.write_line(&message),
            UiEvent::BackendStopped(message) => self.write_line(&format!("[!] {message}")),
            UiEvent::CategoriesChanged(state) => {
                self.categories = state;
                self.redraw()
            }
            UiEvent::SessionChanged(state) => {
                self.session = state;
                self.redraw()
            }
        }
    }

    pub fn write_help(&mut self) -> Result<()> {
        self.write_line(HELP)
    }

    /// Drops the command sender so the backend worker stops once its queue
    /// and in-flight operations are done.
    pub fn close_commands(&mut self) {
        self.cmd_tx = None;
    }

    fn visible_categories(&self) -> Vec<Category> {
        filter_categories(&self.categories.categories, &self.search_text)
    }

    /// Rows are numbered in the filtered view; the controller wants a
    /// position in the full list.
    fn delete_row(&mut self, row: usize) -> Result<()> {
        let visible = self.visible_categories();
        let position = visible.get(row - 1).and_then(|category| {
            self.categories
                .categories
                .iter()
                .position(|candidate| candidate.id == category.id)
        });

        match position {
            Some(position) => self.dispatch(BackendCommand::DeleteCategory { position }),
            None => self.write_line(&format!("no category at row {row}")),
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand) -> Result<()> {
        let name = cmd.name();
        let sent = self.cmd_tx.as_ref().map(|cmd_tx| cmd_tx.try_send(cmd));

        match sent {
            Some(Ok(())) => {
                debug!(command = name, "queued ui->backend command");
                Ok(())
            }
            Some(Err(TrySendError::Full(_))) => {
                warn!(command = name, "ui command queue full");
                self.write_line("UI command queue is full; please retry")
            }
            Some(Err(TrySendError::Disconnected(_))) => {
                self.write_line("Backend worker stopped; restart the app")
            }
            None => self.write_line("Input closed; no more commands are accepted"),
        }
    }

    fn redraw(&mut self) -> Result<()> {
        let mut screen = render_session(&self.session);
        if self.session.user.is_some() {
            screen.push('\n');
            screen.push_str(&render_categories(
                &self.visible_categories(),
                &self.search_text,
            ));
        }
        if let Some(alert) = render_alerts(&self.categories, &self.session) {
            screen.push('\n');
            screen.push_str(&alert);
        }
        self.write_line(&screen)
    }

    fn write_line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}").context("failed to write to terminal")
    }
}

#[cfg(test)]
#[path = "../tests/app_tests.rs"]
mod tests;
