use crate::error::Result;
use crate::workflow::naming::validate_repo_name;
use crate::workflow::normalizer::OutcomeNormalizer;
use crate::workflow::types::{OperationKind, OperationRequest, OperationResult};

/// Entry point of the workflow layer: validates the request and routes it.
pub struct Dispatcher {
    normalizer: OutcomeNormalizer,
}

impl Dispatcher {
    pub fn new(normalizer: OutcomeNormalizer) -> Self {
        Self { normalizer }
    }

    /// Run `operation` for `request`.
    ///
    /// An invalid repository name is returned as an error before any remote
    /// call is made. Everything else, including an unknown operation, comes
    /// back as an [`OperationResult`].
    pub async fn execute(
        &self,
        operation: &str,
        request: &OperationRequest,
    ) -> Result<OperationResult> {
        validate_repo_name(&request.repository_name)?;

        let kind = match operation.parse::<OperationKind>() {
            Ok(kind) => kind,
            Err(unknown) => {
                tracing::warn!(operation = %unknown, "Unsupported operation requested");
                return Ok(OperationResult::failure(format!(
                    "Unsupported operation: {unknown}"
                )));
            }
        };

        tracing::info!(
            operation = %kind,
            org = %self.normalizer.owner(),
            repo = %request.repository_name,
            "Executing repository operation"
        );

        let result = match kind {
            OperationKind::Create => self.normalizer.create(request).await,
            OperationKind::Delete => self.normalizer.delete(&request.repository_name).await,
            OperationKind::Archive => self.normalizer.archive(&request.repository_name).await,
            OperationKind::Update => self.normalizer.update(request).await,
        };

        Ok(result)
    }
}
