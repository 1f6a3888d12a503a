use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use repo_steward::platform::types::*;
use repo_steward::platform::RepoHost;
use repo_steward::workflow::types::{OperationRequest, OperationResult, Status};
use repo_steward::workflow::{Dispatcher, OutcomeNormalizer};

/// An in-memory organization: repository name -> archived flag.
#[derive(Default)]
struct InMemoryOrg {
    repos: Mutex<HashMap<String, bool>>,
    mutations: Mutex<usize>,
}

impl InMemoryOrg {
    fn mutations(&self) -> usize {
        *self.mutations.lock().unwrap()
    }

    fn bump(&self) {
        *self.mutations.lock().unwrap() += 1;
    }
}

#[async_trait]
impl RepoHost for InMemoryOrg {
    async fn get(&self, owner: &str, name: &str) -> Remote<RepoState> {
        match self.repos.lock().unwrap().get(name) {
            Some(archived) => Remote::Ok(RepoState {
                name: name.to_string(),
                archived: *archived,
                html_url: Some(format!("https://host/{owner}/{name}")),
            }),
            None => Remote::NotFound,
        }
    }

    async fn create(&self, org: &str, repo: &NewRepository) -> Remote<CreatedRepo> {
        self.bump();
        let mut repos = self.repos.lock().unwrap();
        if repos.contains_key(&repo.name) {
            return Remote::Failed(RemoteError::new("name already exists on this account"));
        }
        repos.insert(repo.name.clone(), false);
        Remote::Ok(CreatedRepo {
            html_url: Some(format!("https://host/{org}/{}", repo.name)),
        })
    }

    async fn delete(&self, _owner: &str, name: &str) -> Remote<()> {
        self.bump();
        match self.repos.lock().unwrap().remove(name) {
            Some(_) => Remote::Ok(()),
            None => Remote::NotFound,
        }
    }

    async fn update(&self, _owner: &str, name: &str, patch: &RepositoryPatch) -> Remote<()> {
        self.bump();
        match self.repos.lock().unwrap().get_mut(name) {
            Some(archived) => {
                if let Some(value) = patch.archived {
                    *archived = value;
                }
                Remote::Ok(())
            }
            None => Remote::NotFound,
        }
    }
}

fn dispatcher(org: &Arc<InMemoryOrg>) -> Dispatcher {
    Dispatcher::new(OutcomeNormalizer::new(org.clone(), "org", "https://host"))
}

async fn execute(dispatcher: &Dispatcher, operation: &str, name: &str) -> OperationResult {
    dispatcher
        .execute(operation, &OperationRequest::new(name))
        .await
        .expect("valid repository name")
}

#[tokio::test]
async fn create_twice_reports_success_both_times() {
    let org = Arc::new(InMemoryOrg::default());
    let dispatcher = dispatcher(&org);

    let first = execute(&dispatcher, "create", "demo").await;
    assert_eq!(
        first,
        OperationResult::success("Repository demo created successfully")
            .with_url(Some("https://host/org/demo".to_string()))
    );

    let second = execute(&dispatcher, "create", "demo").await;
    assert_eq!(
        second,
        OperationResult::success("Repository demo already exists")
            .with_url(Some("https://host/org/demo".to_string()))
    );
    assert_eq!(org.mutations(), 1);
}

#[tokio::test]
async fn delete_twice_reports_success_both_times() {
    let org = Arc::new(InMemoryOrg::default());
    let dispatcher = dispatcher(&org);
    execute(&dispatcher, "create", "demo").await;

    let first = execute(&dispatcher, "delete", "demo").await;
    assert_eq!(first, OperationResult::success("Repository demo deleted successfully"));

    let second = execute(&dispatcher, "delete", "demo").await;
    assert_eq!(second, OperationResult::success("Repository demo does not exist"));
    assert_eq!(org.mutations(), 2);
}

#[tokio::test]
async fn archive_twice_mutates_once() {
    let org = Arc::new(InMemoryOrg::default());
    let dispatcher = dispatcher(&org);
    execute(&dispatcher, "create", "demo").await;

    let first = execute(&dispatcher, "archive", "demo").await;
    assert_eq!(first, OperationResult::success("Repository demo archived successfully"));

    let before = org.mutations();
    let second = execute(&dispatcher, "archive", "demo").await;
    assert_eq!(second, OperationResult::success("Repository demo is already archived"));
    assert_eq!(org.mutations(), before);
}

#[tokio::test]
async fn update_of_missing_repository_is_not_a_failure() {
    let org = Arc::new(InMemoryOrg::default());
    let dispatcher = dispatcher(&org);

    let result = execute(&dispatcher, "update", "ghost").await;
    assert_eq!(result.status, Status::Success);
    assert_eq!(result.message, "Repository ghost does not exist");
    assert_eq!(org.mutations(), 0);
}

#[tokio::test]
async fn unknown_operation_is_reported_not_raised() {
    let org = Arc::new(InMemoryOrg::default());

    let result = execute(&dispatcher(&org), "transfer", "demo").await;
    assert_eq!(result, OperationResult::failure("Unsupported operation: transfer"));
}

#[tokio::test]
async fn invalid_name_never_reaches_the_remote() {
    let org = Arc::new(InMemoryOrg::default());

    let err = dispatcher(&org)
        .execute("create", &OperationRequest::new("test/repo"))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid repository name. Use only letters, numbers, dots, hyphens, and underscores."
    );
    assert_eq!(org.mutations(), 0);
}
