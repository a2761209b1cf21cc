use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::path::PathBuf;

use jiratoolkit::cli::{InquirePrompter, open_in_browser};
use jiratoolkit::utils::StdEnvProvider;
use jiratoolkit::{CommentUpdate, Configuration, JiraClient, StdInput, UpdateFlags, UpdateRequest};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (defaults to $JIRA_CONFIG_FILE or ~/.config/.jira/.config.yml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue management commands
    Issue {
        #[command(subcommand)]
        issue_command: IssueCommands,
    },
}

#[derive(Subcommand)]
enum IssueCommands {
    /// Issue comment commands
    Comment {
        #[command(subcommand)]
        comment_command: CommentCommands,
    },
}

#[derive(Subcommand)]
enum CommentCommands {
    /// Update an existing comment of an issue
    ///
    /// A body given as an argument always wins over --template. Piped input or
    /// `--template -` switches to non-interactive mode, where ISSUE-KEY and
    /// COMMENT-ID are mandatory.
    Update {
        /// Issue key, or a bare number expanded with the configured project key (will prompt if not provided)
        #[arg(value_name = "ISSUE-KEY")]
        issue_key: Option<String>,

        /// Comment id (will prompt if not provided)
        #[arg(value_name = "COMMENT-ID")]
        comment_id: Option<String>,

        /// New comment body in markdown
        #[arg(value_name = "COMMENT-BODY")]
        body: Option<String>,

        /// Open the issue in the browser after the update
        #[arg(long)]
        web: bool,

        /// Read the comment body from a file, or from standard input with "-"
        #[arg(short = 'T', long)]
        template: Option<String>,

        /// Disable prompt for non-required fields; the body comes from the argument, the template or standard input
        #[arg(long)]
        no_input: bool,

        /// Mark the comment as internal (Jira Service Management)
        #[arg(long)]
        internal: bool,

        /// Trace requests sent to Jira
        #[arg(long)]
        debug: bool,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_level = cli.verbose.log_level_filter();
    if let Commands::Issue {
        issue_command:
            IssueCommands::Comment {
                comment_command: CommentCommands::Update { debug: true, .. },
            },
    } = &cli.command
    {
        log_level = log_level.max(log::LevelFilter::Debug);
    }
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Off) // Turn off all logs by default
        .filter(Some("jiratoolkit"), log_level)
        .init();

    let env = StdEnvProvider;

    match cli.command {
        Commands::Issue { issue_command } => match issue_command {
            IssueCommands::Comment { comment_command } => match comment_command {
                CommentCommands::Update {
                    issue_key,
                    comment_id,
                    body,
                    web,
                    template,
                    no_input,
                    internal,
                    debug,
                } => {
                    let configuration = Configuration::load(cli.config, &env)?;
                    let client = JiraClient::from_configuration(&configuration, &env, debug)?;

                    let args: Vec<String> = [issue_key, comment_id, body]
                        .into_iter()
                        .flatten()
                        .collect();
                    let request = UpdateRequest::from_args(
                        &args,
                        UpdateFlags {
                            template,
                            no_input,
                            internal,
                            debug,
                            web,
                        },
                        configuration.project_key(),
                    );

                    let outcome = CommentUpdate::new(
                        &client,
                        &StdInput,
                        &InquirePrompter,
                        configuration.project_key(),
                    )
                    .run(request)?;

                    println!("{}", outcome);

                    if web {
                        open_in_browser(&outcome.browse_url)?;
                    }
                }
            },
        },
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    println!("CLI feature not enabled. Build with --features cli to use the CLI.");
}
