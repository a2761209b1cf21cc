use std::time::Duration;

pub(crate) mod api;
pub(crate) mod auth;
pub(crate) mod helpers;

pub use api::{
    Comment, CommentAuthor, JiraApiError, JiraReader, JiraWriter, update_comment_payload,
};
pub use auth::{AuthError, Credentials, resolve_credentials};
pub use helpers::{JiraHelpers, browse_url, comment_url};

use crate::configuration::{Configuration, InstallationType};
use crate::utils::EnvProvider;

/// Blocking REST client for a single Jira instance.
#[derive(Debug, Clone)]
pub struct JiraClient {
    pub(crate) server: String,
    pub(crate) installation: InstallationType,
    pub(crate) credentials: Credentials,
    pub(crate) agent: ureq::Agent,
    pub(crate) debug: bool,
}

impl JiraClient {
    pub fn new(
        server: impl Into<String>,
        installation: InstallationType,
        credentials: Credentials,
        debug: bool,
    ) -> Self {
        Self {
            server: server.into().trim_end_matches('/').to_string(),
            installation,
            credentials,
            agent: ureq::AgentBuilder::new()
                .timeout_connect(Duration::from_secs(30))
                .timeout_read(Duration::from_secs(60))
                .user_agent(concat!("jiratoolkit/", env!("CARGO_PKG_VERSION")))
                .build(),
            debug,
        }
    }

    pub fn from_configuration(
        configuration: &Configuration,
        env: &impl EnvProvider,
        debug: bool,
    ) -> Result<Self, AuthError> {
        let credentials = resolve_credentials(configuration, env)?;
        log::debug!(
            "Initialized Jira client for {} ({:?})",
            configuration.server,
            configuration.installation
        );
        Ok(Self::new(
            configuration.server.clone(),
            configuration.installation,
            credentials,
            debug,
        ))
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub(crate) fn api_url(&self, version: u8, path: &str) -> String {
        format!(
            "{}/rest/api/{version}/{}",
            self.server,
            path.trim_start_matches('/')
        )
    }

    pub(crate) fn request(&self, method: &str, url: &str) -> ureq::Request {
        self.agent
            .request(method, url)
            .set("Accept", "application/json")
            .set("Content-Type", "application/json")
            .set("Authorization", &self.credentials.header())
    }

    pub(crate) fn trace(&self, method: &str, url: &str) {
        if self.debug {
            log::info!("{method} {url} ({:?})", self.credentials);
        }
    }

    pub(crate) fn trace_status(&self, status: u16) {
        if self.debug {
            log::info!("Response status: {status}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(server: &str, installation: InstallationType) -> JiraClient {
        JiraClient::new(
            server,
            installation,
            Credentials::Bearer {
                token: "t".to_string(),
            },
            false,
        )
    }

    #[test]
    fn test_api_url() {
        let cloud = client("https://example.atlassian.net/", InstallationType::Cloud);
        assert_eq!(cloud.server(), "https://example.atlassian.net");
        assert_eq!(
            cloud.api_url(3, "/issue/PROJ-1/comment/10"),
            "https://example.atlassian.net/rest/api/3/issue/PROJ-1/comment/10"
        );

        let local = client("https://jira.local", InstallationType::Local);
        assert_eq!(
            local.api_url(local.installation.read_api_version(), "issue/A-1"),
            "https://jira.local/rest/api/2/issue/A-1"
        );
    }

    #[test]
    fn test_client_links() {
        let cloud = client("https://example.atlassian.net", InstallationType::Cloud);
        assert_eq!(
            cloud.comment_url("PROJ-12", "1001"),
            "https://example.atlassian.net/browse/PROJ-12?focusedCommentId=1001"
        );
    }
}
