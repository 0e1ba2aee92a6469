use std::{fs, path::Path};

use shared::protocol::Credentials;
use toml::Table;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_filter: String,
    pub command_queue_capacity: usize,
    pub demo_email: Option<String>,
    pub demo_password: Option<String>,
    pub seed_categories: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: "savvy_cli=info,client_core=info".into(),
            command_queue_capacity: 64,
            demo_email: None,
            demo_password: None,
            seed_categories: Vec::new(),
        }
    }
}

/// Account created at startup so the client has something to sign in to.
#[derive(Debug, Clone)]
pub struct DemoAccount {
    pub credentials: Credentials,
    pub categories: Vec<String>,
}

impl Settings {
    pub fn demo_account(&self) -> Option<DemoAccount> {
        let email = self.demo_email.as_ref()?;
        let password = self.demo_password.as_ref()?;
        Some(DemoAccount {
            credentials: Credentials::new(email.clone(), password.clone()),
            categories: self.seed_categories.clone(),
        })
    }
}

/// Defaults, then `path` if it parses as TOML, then environment variables.
pub fn load_settings(path: &Path) -> Settings {
    let raw = fs::read_to_string(path).ok();
    load_settings_from(raw.as_deref(), |key| std::env::var(key).ok())
}

pub(crate) fn load_settings_from(
    raw_file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(file_cfg) = raw_file.and_then(|raw| raw.parse::<Table>().ok()) {
        if let Some(v) = file_cfg.get("log_filter").and_then(|v| v.as_str()) {
            settings.log_filter = v.to_string();
        }
        if let Some(v) = file_cfg
            .get("command_queue_capacity")
            .and_then(|v| v.as_integer())
            .and_then(|v| usize::try_from(v).ok())
        {
            settings.command_queue_capacity = v;
        }
        if let Some(v) = file_cfg.get("demo_email").and_then(|v| v.as_str()) {
            settings.demo_email = Some(v.to_string());
        }
        if let Some(v) = file_cfg.get("demo_password").and_then(|v| v.as_str()) {
            settings.demo_password = Some(v.to_string());
        }
        if let Some(v) = file_cfg.get("seed_categories").and_then(|v| v.as_array()) {
            settings.seed_categories = v
                .iter()
                .filter_map(|item| item.as_str())
                .map(str::to_string)
                .collect();
        }
    }

    if let Some(v) = env("SAVVY_LOG") {
        settings.log_filter = v;
    }
    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    if let Some(v) = env("APP__COMMAND_QUEUE_CAPACITY") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.command_queue_capacity = parsed;
        }
    }

    if let Some(v) = env("APP__DEMO_EMAIL") {
        settings.demo_email = Some(v);
    }
    if let Some(v) = env("APP__DEMO_PASSWORD") {
        settings.demo_password = Some(v);
    }

    if let Some(v) = env("APP__SEED_CATEGORIES") {
        settings.seed_categories = v
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
    }

    // Zero would turn the command queue into a rendezvous channel.
    settings.command_queue_capacity = settings.command_queue_capacity.max(1);
    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
