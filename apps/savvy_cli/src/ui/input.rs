use crate::backend_bridge::commands::BackendCommand;

pub const HELP: &str = "\
Commands:
  register <email> <password> <confirm>  create an account and sign in
  login <email> <password>               sign in
  list                                   reload categories
  search [text]                          filter categories (no text clears)
  add <name>                             add a category
  delete <row>                           delete the category shown at <row>
  show                                   redraw the current screen
  json                                   print visible categories as JSON
  dismiss                                close the error alert
  logout                                 sign out
  delete-account                         delete the account and sign out
  help                                   show this help
  quit                                   exit";

#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Backend(BackendCommand),
    /// 1-based row of the visible (possibly filtered) list.
    DeleteRow(usize),
    Search(String),
    Show,
    Json,
    Dismiss,
    Help,
    Quit,
}

pub fn parse_input(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };
    let args = rest.split_whitespace().collect::<Vec<_>>();

    match command {
        "register" => match args.as_slice() {
            [email, password, confirm] => Ok(Input::Backend(BackendCommand::Register {
                email: email.to_string(),
                password: password.to_string(),
                confirm_password: confirm.to_string(),
            })),
            _ => Err("usage: register <email> <password> <confirm>".to_string()),
        },
        "login" => match args.as_slice() {
            [email, password] => Ok(Input::Backend(BackendCommand::SignIn {
                email: email.to_string(),
                password: password.to_string(),
            })),
            _ => Err("usage: login <email> <password>".to_string()),
        },
        "list" => Ok(Input::Backend(BackendCommand::FetchCategories)),
        "search" => Ok(Input::Search(rest.to_string())),
        "add" if !rest.is_empty() => Ok(Input::Backend(BackendCommand::AddCategory {
            name: rest.to_string(),
        })),
        "add" => Err("usage: add <name>".to_string()),
        "delete" => match rest.parse::<usize>() {
            Ok(row) if row > 0 => Ok(Input::DeleteRow(row)),
            _ => Err("usage: delete <row>".to_string()),
        },
        "show" | "" => Ok(Input::Show),
        "json" => Ok(Input::Json),
        "dismiss" => Ok(Input::Dismiss),
        "logout" => Ok(Input::Backend(BackendCommand::LogOut)),
        "delete-account" => Ok(Input::Backend(BackendCommand::DeleteAccount)),
        "help" | "?" => Ok(Input::Help),
        "quit" | "exit" => Ok(Input::Quit),
        other => Err(format!("unknown command '{other}'; type 'help'")),
    }
}
