use serde::{Deserialize, Serialize};

use super::JiraApiError;
use crate::jira::JiraClient;
use crate::markup::CommentBody;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAuthor {
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: String,
}

/// A comment as returned by `GET /issue/{key}/comment/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub author: Option<CommentAuthor>,
    #[serde(default, deserialize_with = "CommentBody::deserialize_nullable")]
    pub body: CommentBody,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
}

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
pub trait JiraReader {
    fn get_comment(&self, issue_key: &str, comment_id: &str) -> Result<Comment, JiraApiError>;
}

impl JiraReader for JiraClient {
    fn get_comment(&self, issue_key: &str, comment_id: &str) -> Result<Comment, JiraApiError> {
        let url = self.api_url(
            self.installation.read_api_version(),
            &format!("issue/{issue_key}/comment/{comment_id}"),
        );
        log::debug!("Fetching comment {} of issue {}", comment_id, issue_key);
        self.trace("GET", &url);

        let response = self.request("GET", &url).call()?;
        self.trace_status(response.status());

        let comment: Comment = response.into_json()?;
        log::debug!(
            "Successfully fetched comment {} of issue {}",
            comment.id,
            issue_key
        );

        Ok(comment)
    }
}
