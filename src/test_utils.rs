//! Shared test doubles for the Jira client traits

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::jira::{
    Comment, JiraApiError, JiraHelpers, JiraReader, JiraWriter, browse_url, comment_url,
};
use crate::markup::CommentBody;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCall {
    pub issue_key: String,
    pub comment_id: String,
    pub body: String,
    pub internal: bool,
}

impl UpdateCall {
    pub fn new(issue_key: &str, comment_id: &str, body: &str, internal: bool) -> Self {
        Self {
            issue_key: issue_key.to_string(),
            comment_id: comment_id.to_string(),
            body: body.to_string(),
            internal,
        }
    }
}

/// In-memory Jira that records every remote call.
#[derive(Debug, Clone)]
pub struct FakeJira {
    server: String,
    comments: HashMap<(String, String), Comment>,
    update_failure: Option<(u16, String)>,
    calls: Arc<Mutex<Vec<String>>>,
    updates: Arc<Mutex<Vec<UpdateCall>>>,
}

pub struct FakeJiraBuilder {
    server: String,
    comments: HashMap<(String, String), Comment>,
    update_failure: Option<(u16, String)>,
}

impl FakeJira {
    pub fn builder() -> FakeJiraBuilder {
        FakeJiraBuilder {
            server: "https://jira.example.com".to_string(),
            comments: HashMap::new(),
            update_failure: None,
        }
    }

    /// Remote calls in order, as `"GET KEY/ID"` or `"PUT KEY/ID"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with("GET"))
            .count()
    }

    pub fn updates(&self) -> Vec<UpdateCall> {
        self.updates.lock().unwrap().clone()
    }
}

impl FakeJiraBuilder {
    pub fn with_server(mut self, server: &str) -> Self {
        self.server = server.to_string();
        self
    }

    pub fn with_comment(mut self, issue_key: &str, comment_id: &str, body: CommentBody) -> Self {
        let comment = Comment {
            id: comment_id.to_string(),
            body,
            ..Default::default()
        };
        self.comments
            .insert((issue_key.to_string(), comment_id.to_string()), comment);
        self
    }

    pub fn failing_update(mut self, status: u16, message: &str) -> Self {
        self.update_failure = Some((status, message.to_string()));
        self
    }

    pub fn build(self) -> FakeJira {
        FakeJira {
            server: self.server,
            comments: self.comments,
            update_failure: self.update_failure,
            calls: Arc::new(Mutex::new(Vec::new())),
            updates: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl JiraReader for FakeJira {
    fn get_comment(&self, issue_key: &str, comment_id: &str) -> Result<Comment, JiraApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("GET {issue_key}/{comment_id}"));

        self.comments
            .get(&(issue_key.to_string(), comment_id.to_string()))
            .cloned()
            .ok_or_else(|| JiraApiError::UnexpectedResponse {
                status: 404,
                message: "Comment not found".to_string(),
            })
    }
}

impl JiraWriter for FakeJira {
    fn update_comment(
        &self,
        issue_key: &str,
        comment_id: &str,
        body: &str,
        internal: bool,
    ) -> Result<(), JiraApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("PUT {issue_key}/{comment_id}"));

        if let Some((status, message)) = &self.update_failure {
            return Err(JiraApiError::UnexpectedResponse {
                status: *status,
                message: message.clone(),
            });
        }

        self.updates
            .lock()
            .unwrap()
            .push(UpdateCall::new(issue_key, comment_id, body, internal));
        Ok(())
    }
}

impl JiraHelpers for FakeJira {
    fn browse_url(&self, issue_key: &str) -> String {
        browse_url(&self.server, issue_key)
    }

    fn comment_url(&self, issue_key: &str, comment_id: &str) -> String {
        comment_url(&self.server, issue_key, comment_id)
    }
}
