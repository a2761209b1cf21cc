mod read;
mod write;

pub use read::{Comment, CommentAuthor, JiraReader};
pub use write::{JiraWriter, update_comment_payload};

#[derive(thiserror::Error, Debug)]
pub enum JiraApiError {
    #[error("Jira request failed: {0}")]
    Transport(Box<ureq::Transport>),
    #[error("Unexpected response from Jira ({status}): {message}")]
    UnexpectedResponse { status: u16, message: String },
    #[error("Failed to decode Jira response: {0}")]
    Decode(#[from] std::io::Error),
}

impl From<ureq::Error> for JiraApiError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => {
                let status_text = response.status_text().to_string();
                let body = response.into_string().unwrap_or_default();
                let message = error_message(&body).unwrap_or(status_text);
                JiraApiError::UnexpectedResponse { status, message }
            }
            ureq::Error::Transport(transport) => JiraApiError::Transport(Box::new(transport)),
        }
    }
}

/// Extracts Jira's `errorMessages` and `errors` into a single line.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => {
            let trimmed = body.trim();
            return (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
    };

    let mut messages: Vec<String> = value
        .get("errorMessages")
        .and_then(|m| m.as_array())
        .map(|m| {
            m.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default();

    if let Some(errors) = value.get("errors").and_then(|e| e.as_object()) {
        for (field, error) in errors {
            let error = error.as_str().map(String::from).unwrap_or_else(|| error.to_string());
            messages.push(format!("{field}: {error}"));
        }
    }

    (!messages.is_empty()).then(|| messages.join("; "))
}
