use inquire::{Editor, Select, Text, validator::Validation};

use crate::prompt::{Action, PromptError, Prompter};

/// Terminal prompts backed by inquire.
#[derive(Debug, Default, Clone, Copy)]
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn required_text(&self, message: &str) -> Result<String, PromptError> {
        let field = message.to_string();
        let answer = Text::new(&format!("{message}:"))
            .with_validator(move |input: &str| {
                if input.trim().is_empty() {
                    Ok(Validation::Invalid(format!("{field} is required").into()))
                } else {
                    Ok(Validation::Valid)
                }
            })
            .prompt()
            .map_err(|e| PromptError(format!("Input cancelled: {}", e)))?;
        Ok(answer.trim().to_string())
    }

    fn editor(&self, message: &str, default: &str) -> Result<String, PromptError> {
        Editor::new(message)
            .with_predefined_text(default)
            .with_file_extension(".md")
            .with_help_message("Opens your $EDITOR; the prefilled text can be changed freely")
            .with_validator(|input: &str| {
                if input.trim().is_empty() {
                    Ok(Validation::Invalid("Comment body cannot be empty".into()))
                } else {
                    Ok(Validation::Valid)
                }
            })
            .prompt()
            .map_err(|e| PromptError(format!("Editor cancelled: {}", e)))
    }

    fn select_action(&self, message: &str, options: Vec<Action>) -> Result<Action, PromptError> {
        Select::new(message, options)
            .prompt()
            .map_err(|e| PromptError(format!("Selection cancelled: {}", e)))
    }
}

/// Opens `url` in the default browser.
pub fn open_in_browser(url: &str) -> anyhow::Result<()> {
    log::debug!("Opening {} in browser", url);
    open::that(url).map_err(|e| anyhow::anyhow!("Failed to open {}: {}", url, e))
}
