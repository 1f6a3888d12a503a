use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required environment setting (credential, namespace) is absent.
    #[error("{0} is required")]
    MissingSetting(&'static str),

    #[error("Input required and not supplied: {0}")]
    MissingInput(&'static str),

    #[error("Invalid value for input {name}: {value}")]
    InvalidInput { name: &'static str, value: String },

    #[error("Invalid repository name. Use only letters, numbers, dots, hyphens, and underscores.")]
    InvalidName,

    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<octocrab::Error> for AppError {
    fn from(e: octocrab::Error) -> Self {
        AppError::GitHubApi(e.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
