#[cfg(test)]
use mockall::automock;

/// Choices offered once the comment body is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Submit,
    Cancel,
}

impl Action {
    pub const ALL: [Action; 2] = [Action::Submit, Action::Cancel];
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Submit => write!(f, "Submit"),
            Action::Cancel => write!(f, "Cancel"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[error("Prompt failed: {0}")]
pub struct PromptError(pub String);

/// Blocking terminal questions. Implementations reject empty answers themselves.
#[cfg_attr(test, automock)]
pub trait Prompter {
    /// Single line answer that must not be empty.
    fn required_text(&self, message: &str) -> Result<String, PromptError>;
    /// Multi-line editor opened on `default`; a blank result must be re-entered.
    fn editor(&self, message: &str, default: &str) -> Result<String, PromptError>;
    fn select_action(&self, message: &str, options: Vec<Action>) -> Result<Action, PromptError>;
}
