use thiserror::Error;

/// Unified error type for git-tidy operations
#[derive(Error, Debug)]
pub enum GitTidyError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Cannot determine default branch: {0}")]
    DefaultBranch(String),

    #[error("Branch not found on remote: {0}")]
    BranchNotFound(String),

    #[error("Issue file error: {0}")]
    Issues(#[from] csv::Error),

    #[error("Hosting client error: {0}")]
    Hosting(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-tidy
pub type Result<T> = std::result::Result<T, GitTidyError>;

impl GitTidyError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitTidyError::Config(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        GitTidyError::Remote(msg.into())
    }

    /// Create a default-branch resolution error with context
    pub fn default_branch(msg: impl Into<String>) -> Self {
        GitTidyError::DefaultBranch(msg.into())
    }

    /// Create a missing-branch error for the given name
    pub fn branch_not_found(name: impl Into<String>) -> Self {
        GitTidyError::BranchNotFound(name.into())
    }

    /// Create a hosting client error with context
    pub fn hosting(msg: impl Into<String>) -> Self {
        GitTidyError::Hosting(msg.into())
    }
}
