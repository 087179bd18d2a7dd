use derive_getters::Getters;
use serde::{Deserialize, Serialize};

#[derive(Debug, Getters, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct User {
    username: String,
    #[serde(default)]
    email: String,
}

impl User {
    pub fn new(username: String, email: String) -> Self {
        Self { username, email }
    }
}

/// Body of `GET /auth/check-auth`.
#[derive(Debug, Getters, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct AuthStatus {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    authenticated: bool,
    #[serde(default)]
    user: Option<User>,
}

impl AuthStatus {
    pub fn new(success: bool, authenticated: bool, user: Option<User>) -> Self {
        Self {
            success,
            authenticated,
            user,
        }
    }

    /// Returns the user only when the server confirms both success and authentication.
    pub fn authenticated_user(&self) -> Option<&User> {
        if self.success && self.authenticated {
            self.user.as_ref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parameterized::{ide, parameterized};

    ide!();

    #[parameterized(
        body = {
            r#"{"success": true, "authenticated": true, "user": {"username": "jon", "email": "jon@doe.com"}}"#,
            r#"{"success": true, "authenticated": false}"#,
            r#"{"success": false, "authenticated": true, "user": {"username": "jon", "email": "jon@doe.com"}}"#,
            r#"{"success": true, "authenticated": true}"#,
        },
        expected = {
            Some(User::new("jon".to_owned(), "jon@doe.com".to_owned())),
            None,
            None,
            None,
        }
    )]
    fn should_extract_authenticated_user(body: &str, expected: Option<User>) {
        let status: AuthStatus = serde_json::from_str(body).unwrap();
        assert_eq!(expected.as_ref(), status.authenticated_user());
    }
}
