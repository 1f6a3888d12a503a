use async_trait::async_trait;
use octocrab::Octocrab;
use std::future::Future;
use std::time::Duration;

use crate::config::GitHubConfig;
use crate::error::{AppError, Result};
use crate::platform::types::*;
use crate::platform::RepoHost;

use super::mapper;

pub struct GitHubPlatform {
    client: Octocrab,
    timeout: Duration,
}

impl GitHubPlatform {
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(config.token.clone());

        if let Some(base_url) = &config.api_base_url {
            builder = builder.base_uri(base_url.as_str()).map_err(|e| {
                AppError::Config(format!("Invalid GitHub API URL {base_url}: {e}"))
            })?;
        }

        let client = builder
            .build()
            .map_err(|e| AppError::GitHubApi(format!("Failed to build octocrab client: {e}")))?;

        Ok(Self {
            client,
            timeout: config.request_timeout(),
        })
    }

    /// Run one API call under the per-call timeout. A timeout is a failure,
    /// never an absence.
    async fn call<T, F>(&self, request: F) -> Remote<T>
    where
        T: Send,
        F: Future<Output = octocrab::Result<T>> + Send,
    {
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(value)) => Remote::Ok(value),
            Ok(Err(e)) => mapper::classify_error(e),
            Err(_) => Remote::Failed(RemoteError::new(format!(
                "GitHub API request timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl RepoHost for GitHubPlatform {
    async fn get(&self, owner: &str, name: &str) -> Remote<RepoState> {
        self.call(async {
            let repo = self.client.repos(owner, name).get().await?;
            Ok::<_, octocrab::Error>(mapper::map_repository(repo))
        })
        .await
    }

    async fn create(&self, org: &str, repo: &NewRepository) -> Remote<CreatedRepo> {
        let route = format!("/orgs/{org}/repos");
        self.call(async {
            let body: serde_json::Value = self.client.post(route, Some(repo)).await?;
            Ok::<_, octocrab::Error>(mapper::map_created(&body))
        })
        .await
    }

    async fn delete(&self, owner: &str, name: &str) -> Remote<()> {
        self.call(self.client.repos(owner, name).delete()).await
    }

    async fn update(&self, owner: &str, name: &str, patch: &RepositoryPatch) -> Remote<()> {
        let route = format!("/repos/{owner}/{name}");
        self.call(async {
            let _: serde_json::Value = self.client.patch(route, Some(patch)).await?;
            Ok::<_, octocrab::Error>(())
        })
        .await
    }
}
