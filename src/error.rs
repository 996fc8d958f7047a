use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("File not found: {0}")]
    PathNotFound(String),
    #[error("cannot write {}: {source}", path.display())]
    FileWrite { path: PathBuf, source: io::Error },
    /// Operator declined a confirmation.
    #[error("cancelled by user")]
    Cancelled,
    /// Ctrl-C or end of input.
    #[error("interrupted by user")]
    Interrupted,
    #[error(transparent)]
    Io(#[from] io::Error),
}
