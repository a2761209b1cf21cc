mod configuration;
mod input;
mod issue_key;
mod jira;
pub mod markup;
mod prompt;
mod update;
pub mod utils;

#[cfg(feature = "cli")]
pub mod cli;

pub use configuration::{
    AuthType, Configuration, ConfigurationError, InstallationType, Project, determine_config_path,
};
pub use input::{InputSource, STDIN_SENTINEL, StdInput, TemplateSource};
pub use issue_key::issue_key;
pub use jira::{
    AuthError, Comment, CommentAuthor, Credentials, JiraApiError, JiraClient, JiraHelpers,
    JiraReader, JiraWriter, browse_url, comment_url, resolve_credentials, update_comment_payload,
};
pub use prompt::{Action, PromptError, Prompter};
pub use update::{
    BodyState, CommentUpdate, ExecutionMode, UpdateError, UpdateFlags, UpdateOutcome,
    UpdateRequest,
};

#[cfg(test)]
pub(crate) mod test_utils;
