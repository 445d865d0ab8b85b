use std::fmt::Display;
use tracing::debug;

use super::ServiceError;

/// How a failed call is turned into operator-facing text.
#[derive(Debug, Clone, Copy)]
pub struct FailureText {
    /// Body fields consulted in order; the first non-empty string wins.
    pub keys: &'static [&'static str],
    pub rejected: &'static str,
    pub transport: &'static str,
}

pub const NOTIFY: FailureText = FailureText {
    keys: &["message"],
    rejected: "Failed to send notification.",
    transport: "Network error. Could not send notification.",
};

pub const DEBOARD: FailureText = FailureText {
    keys: &["error", "message"],
    rejected: "An unknown error occurred.",
    transport: "Network error. Please try again.",
};

pub const COLLABORATORS: FailureText = FailureText {
    keys: &["error", "message"],
    rejected: "Failed to fetch collaborators",
    transport: "Network error. Could not fetch collaborators.",
};

pub const PRODUCTS: FailureText = FailureText {
    keys: &["error", "message"],
    rejected: "Failed to fetch products",
    transport: "Network error. Could not fetch products.",
};

pub const CREATE_COLLABORATOR: FailureText = FailureText {
    keys: &["error"],
    rejected: "Failed to create collaborator",
    transport: "Network error. Could not save collaborator.",
};

pub const UPDATE_COLLABORATOR: FailureText = FailureText {
    keys: &["error"],
    rejected: "Failed to update collaborator",
    transport: "Network error. Could not save collaborator.",
};

pub const DELETE_COLLABORATOR: FailureText = FailureText {
    keys: &["error"],
    rejected: "Failed to delete collaborator",
    transport: "Network error. Could not delete collaborator.",
};

pub const DELETE_PRODUCT: FailureText = FailureText {
    keys: &["error"],
    rejected: "Failed to delete product",
    transport: "Network error. Could not delete product.",
};

impl FailureText {
    pub fn rejected(&self, status: u16, body: &str) -> ServiceError {
        let message = extract_message(body, self.keys).unwrap_or_else(|| self.rejected.to_string());
        ServiceError::Rejected { status, message }
    }

    pub fn transport(&self, err: impl Display) -> ServiceError {
        let text = err.to_string();
        if text.trim().is_empty() {
            ServiceError::Transport(self.transport.to_string())
        } else {
            ServiceError::Transport(text)
        }
    }
}

/// Body of an error response. A body that cannot be read is logged and
/// treated as empty, so the fixed fallback text applies.
pub fn body_or_empty<E: Display>(status: u16, read: Result<String, E>) -> String {
    read.unwrap_or_else(|e| {
        debug!("Could not read body of {} response: {}", status, e);
        String::new()
    })
}

/// Pull the first non-empty string field named in `keys` out of a JSON body.
pub fn extract_message(body: &str, keys: &[&str]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    keys.iter()
        .filter_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deboard_prefers_error_over_message() {
        let err = DEBOARD.rejected(500, r#"{"error":"vendor has active bookings","message":"nope"}"#);
        assert_eq!(err.to_string(), "vendor has active bookings");
    }

    #[test]
    fn deboard_falls_back_to_message_then_fixed_text() {
        let err = DEBOARD.rejected(404, r#"{"message":"Vendor not found"}"#);
        assert_eq!(err.to_string(), "Vendor not found");

        let err = DEBOARD.rejected(500, r#"{"error":""}"#);
        assert_eq!(err.to_string(), "An unknown error occurred.");

        let err = DEBOARD.rejected(502, "<html>Bad Gateway</html>");
        assert_eq!(err.to_string(), "An unknown error occurred.");
    }

    #[test]
    fn notify_ignores_error_field() {
        let err = NOTIFY.rejected(400, r#"{"error":"ignored"}"#);
        assert_eq!(
            err,
            ServiceError::Rejected {
                status: 400,
                message: "Failed to send notification.".to_string()
            }
        );
    }

    #[test]
    fn non_string_fields_are_skipped() {
        assert_eq!(extract_message(r#"{"error":{"code":1},"message":"m"}"#, &["error", "message"]), Some("m".to_string()));
        assert_eq!(extract_message("[]", &["error"]), None);
    }

    #[test]
    fn empty_transport_text_uses_fallback() {
        assert_eq!(DEBOARD.transport("").to_string(), "Network error. Please try again.");
        assert_eq!(NOTIFY.transport("connection refused").to_string(), "connection refused");
    }

    #[test]
    fn unreadable_body_falls_back_to_fixed_text() {
        let body = body_or_empty(500, Err("connection reset mid-body"));
        assert_eq!(body, "");
        assert_eq!(DEBOARD.rejected(500, &body).to_string(), "An unknown error occurred.");

        assert_eq!(body_or_empty::<&str>(404, Ok("{}".to_string())), "{}");
    }

    #[test]
    fn catalog_writes_only_read_error_field() {
        let err = UPDATE_COLLABORATOR.rejected(400, r#"{"message":"ignored"}"#);
        assert_eq!(err.to_string(), "Failed to update collaborator");

        let err = DELETE_PRODUCT.rejected(409, r#"{"error":"Product has open orders"}"#);
        assert_eq!(err.to_string(), "Product has open orders");
    }
}
