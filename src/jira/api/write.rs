use super::JiraApiError;
use crate::jira::JiraClient;
use crate::markup::to_jira_md;

const INTERNAL_PROPERTY_KEY: &str = "sd.public.comment";

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
pub trait JiraWriter {
    fn update_comment(
        &self,
        issue_key: &str,
        comment_id: &str,
        body: &str,
        internal: bool,
    ) -> Result<(), JiraApiError>;
}

/// Request payload for a comment update. The markdown body is sent as Jira wiki markup.
pub fn update_comment_payload(body: &str, internal: bool) -> serde_json::Value {
    serde_json::json!({
        "body": to_jira_md(body),
        "properties": [{
            "key": INTERNAL_PROPERTY_KEY,
            "value": { "internal": internal }
        }]
    })
}

impl JiraWriter for JiraClient {
    fn update_comment(
        &self,
        issue_key: &str,
        comment_id: &str,
        body: &str,
        internal: bool,
    ) -> Result<(), JiraApiError> {
        let url = self.api_url(2, &format!("issue/{issue_key}/comment/{comment_id}"));
        log::debug!(
            "Updating comment {} of issue {} (internal: {})",
            comment_id,
            issue_key,
            internal
        );
        self.trace("PUT", &url);

        let response = self
            .request("PUT", &url)
            .send_json(update_comment_payload(body, internal))?;
        self.trace_status(response.status());

        if response.status() != 200 {
            let status = response.status();
            let status_text = response.status_text().to_string();
            let body = response.into_string().unwrap_or_default();
            return Err(JiraApiError::UnexpectedResponse {
                status,
                message: super::error_message(&body).unwrap_or(status_text),
            });
        }

        log::debug!(
            "Successfully updated comment {} of issue {}",
            comment_id,
            issue_key
        );
        Ok(())
    }
}
