pub mod github;
pub mod types;

use async_trait::async_trait;

use types::*;

/// The four repository primitives the workflow layer is built on.
///
/// Implementations report absence as [`Remote::NotFound`] and every other
/// failure as [`Remote::Failed`]; they never return an error past this seam.
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Fetch the current state of a repository.
    async fn get(&self, owner: &str, name: &str) -> Remote<RepoState>;

    /// Create a repository inside an organization.
    async fn create(&self, org: &str, repo: &NewRepository) -> Remote<CreatedRepo>;

    /// Delete a repository.
    async fn delete(&self, owner: &str, name: &str) -> Remote<()>;

    /// Apply a partial update to a repository.
    async fn update(&self, owner: &str, name: &str, patch: &RepositoryPatch) -> Remote<()>;
}
