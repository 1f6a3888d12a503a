use std::sync::Arc;

use crate::platform::types::{NewRepository, Remote, RemoteError, RepositoryPatch};
use crate::platform::RepoHost;
use crate::workflow::types::{OperationRequest, OperationResult};

/// Substring GitHub uses when a create collides with an existing name.
const ALREADY_EXISTS_MARKER: &str = "already exists";

const CREATE_FAILED: &str = "Failed to create repository";
const DELETE_FAILED: &str = "Failed to delete repository";
const ARCHIVE_FAILED: &str = "Failed to archive repository";
const UPDATE_FAILED: &str = "Failed to update repository";

/// Runs repository operations against a [`RepoHost`] and folds every remote
/// outcome into an [`OperationResult`].
///
/// Each operation looks the repository up first and then mutates at most once. Repeating an
/// operation that already took effect reports success, and races between the
/// lookup and the mutation resolve the same way.
pub struct OutcomeNormalizer {
    host: Arc<dyn RepoHost>,
    owner: String,
    web_base_url: String,
}

impl OutcomeNormalizer {
    pub fn new(
        host: Arc<dyn RepoHost>,
        owner: impl Into<String>,
        web_base_url: impl Into<String>,
    ) -> Self {
        Self {
            host,
            owner: owner.into(),
            web_base_url: web_base_url.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Browser URL for a repository when the API did not hand one back.
    fn fallback_url(&self, name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.web_base_url.trim_end_matches('/'),
            self.owner,
            name
        )
    }

    fn already_exists(&self, name: &str, url: Option<String>) -> OperationResult {
        OperationResult::success(format!("Repository {name} already exists"))
            .with_url(Some(url.unwrap_or_else(|| self.fallback_url(name))))
    }

    pub async fn create(&self, request: &OperationRequest) -> OperationResult {
        let name = request.repository_name.as_str();

        match self.host.get(&self.owner, name).await {
            Remote::Ok(existing) => {
                tracing::info!(repo = %name, "Repository already exists, nothing to create");
                return self.already_exists(name, existing.html_url);
            }
            Remote::Failed(e) => return failed(name, "create", &e, CREATE_FAILED),
            Remote::NotFound => {
                tracing::debug!(repo = %name, "Repository absent, creating");
            }
        }

        let new_repo = NewRepository {
            name: name.to_string(),
            attributes: request.attributes.clone(),
        };

        match self.host.create(&self.owner, &new_repo).await {
            Remote::Ok(created) => {
                tracing::info!(repo = %name, "Repository created");
                OperationResult::success(format!("Repository {name} created successfully"))
                    .with_url(Some(
                        created.html_url.unwrap_or_else(|| self.fallback_url(name)),
                    ))
            }
            Remote::Failed(e)
                if e.message()
                    .is_some_and(|m| m.contains(ALREADY_EXISTS_MARKER)) =>
            {
                tracing::warn!(
                    repo = %name,
                    error = e.message().unwrap_or_default(),
                    "Repository appeared between lookup and create"
                );
                self.already_exists(name, None)
            }
            Remote::Failed(e) => failed(name, "create", &e, CREATE_FAILED),
            // GitHub answers 404 both for a missing org and one the token cannot see.
            Remote::NotFound => {
                tracing::error!(
                    repo = %name,
                    org = %self.owner,
                    "Organization not found or not accessible"
                );
                OperationResult::failure(format!(
                    "Organization {} not found or not accessible",
                    self.owner
                ))
            }
        }
    }

    pub async fn delete(&self, name: &str) -> OperationResult {
        match self.host.get(&self.owner, name).await {
            Remote::Ok(_) => {}
            Remote::NotFound => return does_not_exist(name),
            Remote::Failed(e) => return failed(name, "delete", &e, DELETE_FAILED),
        }

        match self.host.delete(&self.owner, name).await {
            Remote::Ok(()) => {
                tracing::info!(repo = %name, "Repository deleted");
                OperationResult::success(format!("Repository {name} deleted successfully"))
            }
            Remote::NotFound => {
                tracing::warn!(repo = %name, "Repository vanished between lookup and delete");
                does_not_exist(name)
            }
            Remote::Failed(e) => failed(name, "delete", &e, DELETE_FAILED),
        }
    }

    pub async fn archive(&self, name: &str) -> OperationResult {
        match self.host.get(&self.owner, name).await {
            Remote::Ok(state) if state.archived => {
                tracing::info!(repo = %name, "Repository already archived, nothing to do");
                return OperationResult::success(format!("Repository {name} is already archived"));
            }
            Remote::Ok(_) => {}
            Remote::NotFound => return does_not_exist(name),
            Remote::Failed(e) => return failed(name, "archive", &e, ARCHIVE_FAILED),
        }

        match self
            .host
            .update(&self.owner, name, &RepositoryPatch::archive())
            .await
        {
            Remote::Ok(()) => {
                tracing::info!(repo = %name, "Repository archived");
                OperationResult::success(format!("Repository {name} archived successfully"))
            }
            Remote::NotFound => {
                tracing::warn!(repo = %name, "Repository vanished between lookup and archive");
                does_not_exist(name)
            }
            Remote::Failed(e) => failed(name, "archive", &e, ARCHIVE_FAILED),
        }
    }

    pub async fn update(&self, request: &OperationRequest) -> OperationResult {
        let name = request.repository_name.as_str();

        match self.host.get(&self.owner, name).await {
            Remote::Ok(_) => {}
            Remote::NotFound => return does_not_exist(name),
            Remote::Failed(e) => return failed(name, "update", &e, UPDATE_FAILED),
        }

        let patch = request.attributes.to_patch();
        match self.host.update(&self.owner, name, &patch).await {
            Remote::Ok(()) => {
                tracing::info!(repo = %name, "Repository updated");
                OperationResult::success(format!("Repository {name} updated successfully"))
            }
            Remote::NotFound => {
                tracing::warn!(repo = %name, "Repository vanished between lookup and update");
                does_not_exist(name)
            }
            Remote::Failed(e) => failed(name, "update", &e, UPDATE_FAILED),
        }
    }
}

fn does_not_exist(name: &str) -> OperationResult {
    tracing::info!(repo = %name, "Repository does not exist");
    OperationResult::success(format!("Repository {name} does not exist"))
}

fn failed(name: &str, operation: &str, error: &RemoteError, fallback: &str) -> OperationResult {
    let message = error.message_or(fallback);
    tracing::error!(repo = %name, operation, error = %message, "Repository operation failed");
    OperationResult::failure(message)
}
