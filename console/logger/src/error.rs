use std::path::PathBuf;

/// Errors of the console logger.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid RON in {}: {source}", path.display())]
    Ron {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file extension does not name a supported format.
    #[error("unsupported file format for {} (expected .ron or .json)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("could not install the console logger: {0}")]
    SetLogger(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, Error>;
