//! GitHub Actions surface: named inputs in, named outputs and a failure
//! signal out.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::platform::types::RepoAttributes;
use crate::platform::RepoHost;
use crate::workflow::types::{OperationKind, OperationRequest, OperationResult};
use crate::workflow::{Dispatcher, OutcomeNormalizer};

const OUTPUT_DELIMITER: &str = "REPO_STEWARD_EOF";

/// Reported when a failure has no text of its own.
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// Action inputs. The runner exposes each `with:` entry as `INPUT_<NAME>`;
/// an empty value means the input was not given.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ActionInputs {
    /// One of create, delete, archive, update
    #[arg(long, env = "INPUT_OPERATION", default_value = "")]
    pub operation: String,

    #[arg(long, env = "INPUT_REPOSITORY_NAME", default_value = "")]
    pub repository_name: String,

    #[arg(long, env = "INPUT_DESCRIPTION", default_value = "")]
    pub description: String,

    #[arg(long, env = "INPUT_PRIVATE", default_value = "")]
    pub private: String,

    #[arg(long, env = "INPUT_AUTO_INIT", default_value = "")]
    pub auto_init: String,

    #[arg(long, env = "INPUT_GITIGNORE_TEMPLATE", default_value = "")]
    pub gitignore_template: String,

    #[arg(long, env = "INPUT_LICENSE_TEMPLATE", default_value = "")]
    pub license_template: String,

    #[arg(long, env = "INPUT_HOMEPAGE", default_value = "")]
    pub homepage: String,

    #[arg(long, env = "INPUT_HAS_ISSUES", default_value = "")]
    pub has_issues: String,

    #[arg(long, env = "INPUT_HAS_PROJECTS", default_value = "")]
    pub has_projects: String,

    #[arg(long, env = "INPUT_HAS_WIKI", default_value = "")]
    pub has_wiki: String,

    #[arg(long, env = "INPUT_HAS_DISCUSSIONS", default_value = "")]
    pub has_discussions: String,

    /// Team granted access to a new repository
    #[arg(long, env = "INPUT_TEAM_ID", default_value = "")]
    pub team_id: String,

    #[arg(long, env = "INPUT_ALLOW_SQUASH_MERGE", default_value = "")]
    pub allow_squash_merge: String,

    #[arg(long, env = "INPUT_ALLOW_MERGE_COMMIT", default_value = "")]
    pub allow_merge_commit: String,

    #[arg(long, env = "INPUT_ALLOW_REBASE_MERGE", default_value = "")]
    pub allow_rebase_merge: String,

    #[arg(long, env = "INPUT_ALLOW_AUTO_MERGE", default_value = "")]
    pub allow_auto_merge: String,

    #[arg(long, env = "INPUT_DELETE_BRANCH_ON_MERGE", default_value = "")]
    pub delete_branch_on_merge: String,

    #[arg(long, env = "INPUT_ALLOW_UPDATE_BRANCH", default_value = "")]
    pub allow_update_branch: String,

    #[arg(long, env = "INPUT_DEFAULT_BRANCH", default_value = "")]
    pub default_branch: String,

    #[arg(long, env = "INPUT_USE_SQUASH_PR_TITLE_AS_DEFAULT", default_value = "")]
    pub use_squash_pr_title_as_default: String,

    /// PR_TITLE or COMMIT_OR_PR_TITLE
    #[arg(long, env = "INPUT_SQUASH_MERGE_COMMIT_TITLE", default_value = "")]
    pub squash_merge_commit_title: String,

    /// PR_BODY, COMMIT_MESSAGES or BLANK
    #[arg(long, env = "INPUT_SQUASH_MERGE_COMMIT_MESSAGE", default_value = "")]
    pub squash_merge_commit_message: String,

    /// PR_TITLE or MERGE_MESSAGE
    #[arg(long, env = "INPUT_MERGE_COMMIT_TITLE", default_value = "")]
    pub merge_commit_title: String,

    /// PR_BODY, PR_TITLE or BLANK
    #[arg(long, env = "INPUT_MERGE_COMMIT_MESSAGE", default_value = "")]
    pub merge_commit_message: String,
}

fn text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Boolean inputs are true only when literally `"true"`.
fn flag(value: &str) -> bool {
    value.trim() == "true"
}

fn optional_flag(value: &str) -> Option<bool> {
    text(value).map(|v| flag(&v))
}

/// Parse an enumerated input using the API spelling of its variants.
fn choice<T: DeserializeOwned>(name: &'static str, value: &str) -> Result<Option<T>> {
    let Some(value) = text(value) else {
        return Ok(None);
    };
    serde_json::from_value(serde_json::Value::String(value.clone()))
        .map(Some)
        .map_err(|_| AppError::InvalidInput { name, value })
}

impl ActionInputs {
    /// The operation and repository name, which every invocation needs.
    pub fn required(&self) -> Result<(&str, &str)> {
        let operation = self.operation.trim();
        if operation.is_empty() {
            return Err(AppError::MissingInput("operation"));
        }
        let repository_name = self.repository_name.trim();
        if repository_name.is_empty() {
            return Err(AppError::MissingInput("repository_name"));
        }
        Ok((operation, repository_name))
    }

    /// Build the request for `operation`. Delete, archive and unknown
    /// operations only carry the repository name.
    pub fn to_request(&self, operation: &str) -> Result<OperationRequest> {
        let (_, repository_name) = self.required()?;
        let attributes = match operation.parse::<OperationKind>() {
            Ok(OperationKind::Create) => self.create_attributes()?,
            Ok(OperationKind::Update) => self.update_attributes(),
            _ => RepoAttributes::default(),
        };
        Ok(OperationRequest::new(repository_name).with_attributes(attributes))
    }

    /// Given flags are sent as literal `"true"` comparisons; flags that were
    /// not given are left out so the API defaults apply.
    pub fn create_attributes(&self) -> Result<RepoAttributes> {
        Ok(RepoAttributes {
            description: text(&self.description),
            homepage: text(&self.homepage),
            private: optional_flag(&self.private),
            auto_init: optional_flag(&self.auto_init),
            gitignore_template: text(&self.gitignore_template),
            license_template: text(&self.license_template),
            has_issues: optional_flag(&self.has_issues),
            has_projects: optional_flag(&self.has_projects),
            has_wiki: optional_flag(&self.has_wiki),
            has_discussions: optional_flag(&self.has_discussions),
            team_id: self.team_id.trim().parse::<u64>().ok().filter(|id| *id != 0),
            allow_squash_merge: optional_flag(&self.allow_squash_merge),
            allow_merge_commit: optional_flag(&self.allow_merge_commit),
            allow_rebase_merge: optional_flag(&self.allow_rebase_merge),
            allow_auto_merge: optional_flag(&self.allow_auto_merge),
            delete_branch_on_merge: optional_flag(&self.delete_branch_on_merge),
            allow_update_branch: optional_flag(&self.allow_update_branch),
            // The create endpoint has no default_branch; it is only applied on update.
            default_branch: None,
            use_squash_pr_title_as_default: optional_flag(&self.use_squash_pr_title_as_default),
            squash_merge_commit_title: choice(
                "squash_merge_commit_title",
                &self.squash_merge_commit_title,
            )?,
            squash_merge_commit_message: choice(
                "squash_merge_commit_message",
                &self.squash_merge_commit_message,
            )?,
            merge_commit_title: choice("merge_commit_title", &self.merge_commit_title)?,
            merge_commit_message: choice("merge_commit_message", &self.merge_commit_message)?,
        })
    }

    /// Only inputs that were given end up in the patch.
    pub fn update_attributes(&self) -> RepoAttributes {
        RepoAttributes {
            description: text(&self.description),
            homepage: text(&self.homepage),
            private: optional_flag(&self.private),
            has_issues: optional_flag(&self.has_issues),
            has_projects: optional_flag(&self.has_projects),
            has_wiki: optional_flag(&self.has_wiki),
            has_discussions: optional_flag(&self.has_discussions),
            default_branch: text(&self.default_branch),
            ..RepoAttributes::default()
        }
    }
}

/// Run one action invocation against `host`.
pub async fn run(
    config: &AppConfig,
    inputs: &ActionInputs,
    host: Arc<dyn RepoHost>,
) -> Result<OperationResult> {
    let (operation, _) = inputs.required()?;
    let request = inputs.to_request(operation)?;

    let normalizer = OutcomeNormalizer::new(host, &config.github.org, &config.github.web_base_url);
    Dispatcher::new(normalizer).execute(operation, &request).await
}

/// Message reported for an error that escaped to the top level.
pub fn failure_message(error: &dyn std::fmt::Display) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}

/// Destination for step outputs.
#[derive(Debug, Clone)]
pub struct OutputSink {
    path: Option<PathBuf>,
}

impl OutputSink {
    /// Write to `$GITHUB_OUTPUT`, or stdout when it is not set.
    pub fn from_env() -> Self {
        Self {
            path: std::env::var_os("GITHUB_OUTPUT")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn stdout() -> Self {
        Self { path: None }
    }

    /// Emit `status`, `message` and, when present, `repository_url`.
    pub fn write(&self, result: &OperationResult) -> Result<()> {
        let mut outputs = vec![
            ("status", result.status.as_str()),
            ("message", result.message.as_str()),
        ];
        if let Some(url) = &result.repository_url {
            outputs.push(("repository_url", url.as_str()));
        }

        match &self.path {
            Some(path) => {
                let mut file = OpenOptions::new().append(true).create(true).open(path)?;
                for (name, value) in outputs {
                    write_output(&mut file, name, value)?;
                }
            }
            None => {
                let stdout = std::io::stdout();
                let mut w = stdout.lock();
                for (name, value) in outputs {
                    writeln!(w, "{name}={value}")?;
                }
            }
        }
        Ok(())
    }
}

/// Append one output using the multiline `name<<DELIMITER` syntax.
fn write_output(w: &mut impl Write, name: &str, value: &str) -> std::io::Result<()> {
    let mut delimiter = OUTPUT_DELIMITER.to_string();
    while value.contains(&delimiter) {
        delimiter.push('_');
    }
    writeln!(w, "{name}<<{delimiter}")?;
    writeln!(w, "{value}")?;
    writeln!(w, "{delimiter}")
}

/// Escape text for a `::error::` workflow command.
fn escape_command_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Write the outputs for `result` and, on failure, the `::error::` command
/// to `out`. Returns whether the step succeeded.
pub fn report(result: &OperationResult, sink: &OutputSink, out: &mut impl Write) -> bool {
    if let Err(e) = sink.write(result) {
        tracing::error!(error = %e, "Failed to write step outputs");
    }

    if result.is_success() {
        tracing::info!(message = %result.message, "Repository operation succeeded");
        return true;
    }

    if let Err(e) = writeln!(out, "::error::{}", escape_command_data(&result.message)) {
        tracing::error!(error = %e, "Failed to emit failure signal");
    }
    false
}

/// Report `result` to the runner and map it to the process exit code.
pub fn publish(result: &OperationResult, sink: &OutputSink) -> ExitCode {
    let stdout = std::io::stdout();
    if report(result, sink, &mut stdout.lock()) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
