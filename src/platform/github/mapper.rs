use crate::platform::types::{CreatedRepo, Remote, RemoteError, RepoState};

/// Text GitHub uses for missing resources. Only consulted when a failure
/// carries no HTTP status (transport-level errors); the endpoint must keep
/// reporting absence this way.
pub const NOT_FOUND_MARKER: &str = "Not Found";

/// Map an octocrab Repository to our platform RepoState.
pub fn map_repository(repo: octocrab::models::Repository) -> RepoState {
    RepoState {
        name: repo.name,
        archived: repo.archived.unwrap_or(false),
        html_url: repo.html_url.map(|url| url.to_string()),
    }
}

/// Map the raw JSON body returned by `POST /orgs/{org}/repos`.
pub fn map_created(body: &serde_json::Value) -> CreatedRepo {
    CreatedRepo {
        html_url: body["html_url"].as_str().map(|s| s.to_string()),
    }
}

/// Classify an octocrab error into absence or failure.
pub fn classify_error<T>(error: octocrab::Error) -> Remote<T> {
    match &error {
        octocrab::Error::GitHub { source, .. } => classify_status(
            source.status_code.as_u16(),
            &describe_github_error(&source.message, source.errors.as_deref()),
        ),
        _ => classify_message(&error.to_string()),
    }
}

/// Classify a failure that carries an HTTP status. Only 404 is absence; the
/// message text is not consulted.
pub fn classify_status<T>(status: u16, message: &str) -> Remote<T> {
    if status == 404 {
        Remote::NotFound
    } else {
        Remote::Failed(RemoteError::new(message))
    }
}

/// Classify a failure that only has text to go on.
pub fn classify_message<T>(message: &str) -> Remote<T> {
    if message.contains(NOT_FOUND_MARKER) {
        Remote::NotFound
    } else {
        Remote::Failed(RemoteError::new(message))
    }
}

/// GitHub puts validation details (e.g. "name already exists on this account")
/// in the `errors` array rather than the top-level message.
pub fn describe_github_error(message: &str, errors: Option<&[serde_json::Value]>) -> String {
    let details: Vec<&str> = errors
        .unwrap_or_default()
        .iter()
        .filter_map(|e| e["message"].as_str())
        .collect();

    if details.is_empty() {
        message.to_string()
    } else {
        format!("{message}: {}", details.join("; "))
    }
}
