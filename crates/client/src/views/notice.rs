use core::fmt;

use crate::error::{ActionError, ClientError};
use crate::views::ListError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A one-line message shown after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Message for a failed `action` (e.g. `"signup"`).
    ///
    /// HTTP failures always carry the status code, and the body when there
    /// is one.
    #[must_use]
    pub fn failure(action: &str, err: &ActionError) -> Self {
        let message = match err {
            ActionError::Client(client) | ActionError::List(ListError::Client(client)) => {
                client_message(action, client)
            }
            ActionError::Store(e) => format!("Could not access local state: {e}"),
            ActionError::Validation(e) => e.to_string(),
            ActionError::Cart(e) => e.to_string(),
            ActionError::List(e) => e.to_string(),
        };
        Self::error(message)
    }
}

fn client_message(action: &str, err: &ClientError) -> String {
    match err {
        ClientError::Http { status, body } if body.trim().is_empty() => {
            format!("{} failed ({status})", capitalized(action))
        }
        ClientError::Http { status, body } => {
            format!("{} failed ({status}): {}", capitalized(action), body.trim())
        }
        ClientError::Network(_) => format!("Network error during {action}. See the log for details."),
        ClientError::DataShape(message) => message.clone(),
        ClientError::Encode(_) | ClientError::Url(_) => {
            format!("{} failed: {err}", capitalized(action))
        }
    }
}

fn capitalized(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NoticeLevel::Success | NoticeLevel::Info => f.write_str(&self.message),
            NoticeLevel::Error => write!(f, "Error: {}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartError;
    use crate::error::ValidationError;

    fn http(status: u16, body: &str) -> ActionError {
        ActionError::Client(ClientError::Http {
            status,
            body: body.to_string(),
        })
    }

    #[test]
    fn test_http_failure_carries_status_and_body() {
        let notice = Notice::failure("signup", &http(409, "email taken"));
        assert_eq!(notice.message, "Signup failed (409): email taken");
        assert_eq!(notice.level, NoticeLevel::Error);

        let notice = Notice::failure("checkout", &http(500, ""));
        assert_eq!(notice.message, "Checkout failed (500)");
    }

    #[test]
    fn test_status_verbatim_for_every_code() {
        for status in [400_u16, 401, 403, 404, 409, 418, 500, 502, 503] {
            let notice = Notice::failure("update", &http(status, "x"));
            assert!(notice.message.contains(&status.to_string()));
        }
    }

    #[test]
    fn test_list_client_error_is_unwrapped() {
        let err = ActionError::List(ListError::Client(ClientError::Http {
            status: 404,
            body: String::new(),
        }));
        assert_eq!(
            Notice::failure("delete", &err).message,
            "Delete failed (404)"
        );
    }

    #[test]
    fn test_local_failures() {
        let notice = Notice::failure("checkout", &ActionError::Cart(CartError::Empty));
        assert_eq!(notice.to_string(), "Error: Your cart is empty");

        let notice = Notice::failure(
            "signup",
            &ActionError::Validation(ValidationError::MissingField("Address")),
        );
        assert_eq!(notice.message, "Address is required.");

        let notice = Notice::failure(
            "signup",
            &ActionError::Client(ClientError::DataShape(
                "Signup succeeded but no id returned.".to_string(),
            )),
        );
        assert_eq!(notice.message, "Signup succeeded but no id returned.");
    }

    #[test]
    fn test_success_display() {
        assert_eq!(Notice::success("Saved").to_string(), "Saved");
    }
}
