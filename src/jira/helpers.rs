#[cfg(test)]
use mockall::automock;

use crate::jira::JiraClient;

/// Links into the Jira web interface.
#[cfg_attr(test, automock)]
pub trait JiraHelpers {
    fn browse_url(&self, issue_key: &str) -> String;
    fn comment_url(&self, issue_key: &str, comment_id: &str) -> String;
}

pub fn browse_url(server: &str, issue_key: &str) -> String {
    format!("{}/browse/{issue_key}", server.trim_end_matches('/'))
}

/// Browse URL with the comment focused.
pub fn comment_url(server: &str, issue_key: &str, comment_id: &str) -> String {
    format!("{}?focusedCommentId={comment_id}", browse_url(server, issue_key))
}

impl JiraHelpers for JiraClient {
    fn browse_url(&self, issue_key: &str) -> String {
        browse_url(&self.server, issue_key)
    }

    fn comment_url(&self, issue_key: &str, comment_id: &str) -> String {
        comment_url(&self.server, issue_key, comment_id)
    }
}
