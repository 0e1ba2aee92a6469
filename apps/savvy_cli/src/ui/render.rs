use client_core::{ControllerState, SessionState};
use shared::domain::Category;

pub fn render_session(state: &SessionState) -> String {
    match &state.user {
        Some(user) => format!("Signed in as {}", user.email),
        None => "Not signed in. Use 'login' or 'register'.".to_string(),
    }
}

pub fn render_categories(rows: &[Category], search_text: &str) -> String {
    let mut out = if search_text.is_empty() {
        "Categories".to_string()
    } else {
        format!("Categories matching \"{search_text}\"")
    };

    if rows.is_empty() {
        out.push_str("\n  (none)");
    }
    for (row, category) in rows.iter().enumerate() {
        out.push_str(&format!("\n  {:>2}. {}", row + 1, category.name));
    }
    out
}

/// Alert box for whichever screen currently has an error raised.
pub fn render_alerts(categories: &ControllerState, session: &SessionState) -> Option<String> {
    let messages = [
        (session.has_error, session.error_message.as_str()),
        (categories.has_error, categories.error_message.as_str()),
    ]
    .into_iter()
    .filter(|(has_error, _)| *has_error)
    .map(|(_, message)| format!("[!] {message}"))
    .collect::<Vec<_>>();

    if messages.is_empty() {
        None
    } else {
        Some(format!("{}\n    (type 'dismiss' to close)", messages.join("\n")))
    }
}
