//! Backend commands queued from UI to backend worker.

use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub enum BackendCommand {
    Register {
        email: String,
        password: String,
        confirm_password: String,
    },
    SignIn {
        email: String,
        password: String,
    },
    FetchCategories,
    AddCategory {
        name: String,
    },
    DeleteCategory {
        position: usize,
    },
    LogOut,
    DeleteAccount,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Register { .. } => "register",
            Self::SignIn { .. } => "sign_in",
            Self::FetchCategories => "fetch_categories",
            Self::AddCategory { .. } => "add_category",
            Self::DeleteCategory { .. } => "delete_category",
            Self::LogOut => "log_out",
            Self::DeleteAccount => "delete_account",
        }
    }
}

// Passwords stay out of logs and assertion output.
impl fmt::Debug for BackendCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register { email, .. } | Self::SignIn { email, .. } => {
                write!(f, "{}({email})", self.name())
            }
            Self::AddCategory { name } => write!(f, "{}({name:?})", self.name()),
            Self::DeleteCategory { position } => write!(f, "{}({position})", self.name()),
            _ => f.write_str(self.name()),
        }
    }
}
