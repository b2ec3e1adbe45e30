use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum EvolveError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("population is empty")]
    EmptyPopulation,
    #[error("render failed: {0}")]
    Render(String),
    #[error("image size mismatch: got {got:?}, expected {expected:?}")]
    SizeMismatch {
        got: (u32, u32),
        expected: (u32, u32),
    },
    #[error("failed to load target image {path:?}: {message}")]
    ImageLoad { path: PathBuf, message: String },
    #[error("failed to write snapshot {path:?}: {message}")]
    Snapshot { path: PathBuf, message: String },
    #[cfg(feature = "parallel")]
    #[error("failed to build evaluation pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
