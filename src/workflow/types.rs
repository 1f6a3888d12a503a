use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::platform::types::RepoAttributes;

/// The four supported repository operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Create,
    Delete,
    Archive,
    Update,
}

impl FromStr for OperationKind {
    type Err = String;

    /// Case-insensitive; the error carries the input unchanged.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "create" => Ok(OperationKind::Create),
            "delete" => Ok(OperationKind::Delete),
            "archive" => Ok(OperationKind::Archive),
            "update" => Ok(OperationKind::Update),
            _ => Err(s.to_string()),
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Create => "create",
            OperationKind::Delete => "delete",
            OperationKind::Archive => "archive",
            OperationKind::Update => "update",
        };
        f.write_str(name)
    }
}

/// One invocation's worth of input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationRequest {
    pub repository_name: String,
    pub attributes: RepoAttributes,
}

impl OperationRequest {
    pub fn new(repository_name: impl Into<String>) -> Self {
        Self {
            repository_name: repository_name.into(),
            attributes: RepoAttributes::default(),
        }
    }

    pub fn with_attributes(mut self, attributes: RepoAttributes) -> Self {
        self.attributes = attributes;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failure,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Failure => "failure",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The uniform outcome of every operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationResult {
    pub status: Status,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
}

impl OperationResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
            repository_url: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: Status::Failure,
            message: message.into(),
            repository_url: None,
        }
    }

    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.repository_url = url;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_kind_is_case_insensitive() {
        assert_eq!("CREATE".parse::<OperationKind>(), Ok(OperationKind::Create));
        assert_eq!("Archive".parse::<OperationKind>(), Ok(OperationKind::Archive));
        assert_eq!("update".parse::<OperationKind>(), Ok(OperationKind::Update));
        assert_eq!(
            "Rename".parse::<OperationKind>(),
            Err("Rename".to_string())
        );
    }

    #[test]
    fn test_result_serialization_omits_missing_url() {
        let result = OperationResult::failure("Failed to delete repository");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({ "status": "failure", "message": "Failed to delete repository" })
        );
    }
}
