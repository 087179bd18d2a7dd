use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Generic acknowledgement returned by form actions, deletions and logout.
#[derive(Debug, Getters, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct ApiResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

impl ApiResponse {
    pub fn new(success: bool, message: Option<String>) -> Self {
        Self { success, message }
    }

    /// The server-provided message, if any and not blank.
    pub fn message_or<'a>(&'a self, default: &'a str) -> &'a str {
        match &self.message {
            Some(message) if !message.trim().is_empty() => message,
            _ => default,
        }
    }
}
