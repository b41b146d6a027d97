use std::path::PathBuf;
use thiserror::Error;

pub type InitResult<T> = Result<T, InitError>;

/// Failure while scaffolding `.smarttask/`.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("{} already exists; pass --force to overwrite it", .0.display())]
    DirectoryExists(PathBuf),

    /// An embedded template is missing from the binary.
    #[error("Embedded template '{0}' is missing")]
    TemplateNotFound(String),

    #[error("Cannot create {}: {source}", path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
