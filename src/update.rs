//! `issue comment update`: resolves the comment body and submits it.

use crate::input::{InputSource, STDIN_SENTINEL, TemplateSource};
use crate::issue_key::issue_key;
use crate::jira::{JiraApiError, JiraHelpers, JiraReader, JiraWriter};
use crate::prompt::{Action, PromptError, Prompter};

/// Named flags of the update command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateFlags {
    pub template: Option<String>,
    pub no_input: bool,
    pub internal: bool,
    pub debug: bool,
    pub web: bool,
}

/// The record threaded through the update. Empty strings mean "not resolved yet".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRequest {
    pub issue_key: String,
    pub comment_id: String,
    pub body: String,
    pub template: String,
    pub no_input: bool,
    pub internal: bool,
    pub debug: bool,
    pub web: bool,
}

impl UpdateRequest {
    /// Positional arguments are `ISSUE-KEY COMMENT-ID [COMMENT-BODY]`; extra arguments are ignored.
    pub fn from_args(args: &[String], flags: UpdateFlags, project_key: &str) -> Self {
        let issue_key = args
            .first()
            .map(|token| issue_key(project_key, token))
            .unwrap_or_default();

        Self {
            issue_key,
            comment_id: args.get(1).cloned().unwrap_or_default(),
            body: args.get(2).cloned().unwrap_or_default(),
            template: flags.template.unwrap_or_default(),
            no_input: flags.no_input,
            internal: flags.internal,
            debug: flags.debug,
            web: flags.web,
        }
    }

    fn is_mandatory_missing(&self) -> bool {
        self.issue_key.is_empty() || self.comment_id.is_empty()
    }
}

/// Interactive vs non-interactive execution, decided once before anything reads stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionMode {
    pub stdin_has_data: bool,
    pub non_interactive: bool,
}

impl ExecutionMode {
    pub fn detect(request: &UpdateRequest, input: &impl InputSource) -> Self {
        let stdin_has_data = input.stdin_has_data();
        let non_interactive = stdin_has_data || request.template == STDIN_SENTINEL;
        log::debug!(
            "Execution mode: stdin_has_data={}, non_interactive={}",
            stdin_has_data,
            non_interactive
        );
        Self {
            stdin_has_data,
            non_interactive,
        }
    }
}

/// Body resolution states. Each state either resolves the body or hands over to the next source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyState {
    Literal,
    Template,
    NonInteractive { default: String },
    RemotePrefill,
    Edit { default: String },
    Resolved(String),
}

#[derive(thiserror::Error, Debug)]
pub enum UpdateError {
    #[error("`ISSUE-KEY` & `COMMENT-ID` are mandatory when using a non-interactive mode")]
    MissingMandatory,
    #[error("Failed to read comment body: {0}")]
    Read(#[source] std::io::Error),
    #[error(transparent)]
    Api(#[from] JiraApiError),
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error("Action aborted")]
    Aborted,
}

/// Result of a successful update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub issue_key: String,
    pub comment_id: String,
    pub comment_url: String,
    pub browse_url: String,
}

impl std::fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "✅ Comment {:?} of issue {:?} updated",
            self.comment_id, self.issue_key
        )?;
        write!(f, "{}", self.comment_url)
    }
}

pub struct CommentUpdate<'a, C, I, P> {
    client: &'a C,
    input: &'a I,
    prompter: &'a P,
    project_key: &'a str,
}

impl<'a, C, I, P> CommentUpdate<'a, C, I, P>
where
    C: JiraReader + JiraWriter + JiraHelpers,
    I: InputSource,
    P: Prompter,
{
    pub fn new(client: &'a C, input: &'a I, prompter: &'a P, project_key: &'a str) -> Self {
        Self {
            client,
            input,
            prompter,
            project_key,
        }
    }

    pub fn run(&self, mut request: UpdateRequest) -> Result<UpdateOutcome, UpdateError> {
        let mode = ExecutionMode::detect(&request, self.input);
        if mode.non_interactive {
            request.no_input = true;
        }

        // Stdin carries the body, so nobody is there to answer a prompt for the missing fields
        if mode.non_interactive && request.is_mandatory_missing() {
            return Err(UpdateError::MissingMandatory);
        }

        self.set_issue_key(&mut request)?;
        self.set_comment_id(&mut request)?;
        request.body = self.resolve_body(&request, mode)?;

        if !request.no_input {
            self.confirm()?;
        }

        self.commit(&request)
    }

    fn set_issue_key(&self, request: &mut UpdateRequest) -> Result<(), UpdateError> {
        if !request.issue_key.is_empty() {
            return Ok(());
        }
        let answer = self.prompter.required_text("Issue key")?;
        request.issue_key = issue_key(self.project_key, &answer);
        Ok(())
    }

    fn set_comment_id(&self, request: &mut UpdateRequest) -> Result<(), UpdateError> {
        if !request.comment_id.is_empty() {
            return Ok(());
        }
        request.comment_id = self.prompter.required_text("Comment ID")?;
        Ok(())
    }

    /// Runs the body state machine to completion.
    pub fn resolve_body(
        &self,
        request: &UpdateRequest,
        mode: ExecutionMode,
    ) -> Result<String, UpdateError> {
        let mut state = BodyState::Literal;
        loop {
            log::debug!("Body resolution state: {:?}", state);
            state = match self.step(state, request, mode)? {
                BodyState::Resolved(body) => return Ok(body),
                next => next,
            };
        }
    }

    /// Performs a single transition of the body state machine.
    pub fn step(
        &self,
        state: BodyState,
        request: &UpdateRequest,
        mode: ExecutionMode,
    ) -> Result<BodyState, UpdateError> {
        let next = match state {
            BodyState::Literal => {
                if !request.body.is_empty() {
                    BodyState::Resolved(request.body.clone())
                } else if !request.template.is_empty() || mode.stdin_has_data {
                    BodyState::Template
                } else if request.no_input {
                    BodyState::NonInteractive {
                        default: String::new(),
                    }
                } else {
                    BodyState::RemotePrefill
                }
            }
            BodyState::Template => {
                let source = TemplateSource::from_flag(&request.template);
                let content = self.input.read(&source).map_err(UpdateError::Read)?;
                if request.no_input {
                    BodyState::NonInteractive { default: content }
                } else {
                    BodyState::Edit { default: content }
                }
            }
            BodyState::NonInteractive { default } => BodyState::Resolved(default),
            BodyState::RemotePrefill => {
                let comment = self
                    .client
                    .get_comment(&request.issue_key, &request.comment_id)?;
                BodyState::Edit {
                    default: comment.body.to_markdown(),
                }
            }
            BodyState::Edit { default } => {
                BodyState::Resolved(self.prompter.editor("Comment body", &default)?)
            }
            BodyState::Resolved(body) => BodyState::Resolved(body),
        };
        Ok(next)
    }

    fn confirm(&self) -> Result<(), UpdateError> {
        match self
            .prompter
            .select_action("What's next?", Action::ALL.to_vec())?
        {
            Action::Submit => Ok(()),
            Action::Cancel => Err(UpdateError::Aborted),
        }
    }

    fn commit(&self, request: &UpdateRequest) -> Result<UpdateOutcome, UpdateError> {
        if request.body.trim().is_empty() {
            log::warn!("Submitting an empty comment body");
        }
        log::info!(
            "Updating comment {} of issue {}",
            request.comment_id,
            request.issue_key
        );
        self.client.update_comment(
            &request.issue_key,
            &request.comment_id,
            &request.body,
            request.internal,
        )?;

        Ok(UpdateOutcome {
            issue_key: request.issue_key.clone(),
            comment_id: request.comment_id.clone(),
            comment_url: self
                .client
                .comment_url(&request.issue_key, &request.comment_id),
            browse_url: self.client.browse_url(&request.issue_key),
        })
    }
}
