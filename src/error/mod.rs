use crate::state::StateError;
use crate::storage::StorageError;
use crate::stroke::CaptureError;
use crate::submit::SubmitError;
use crate::surface::SurfaceError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid command line: {0}")]
    Usage(String),
    #[error("gtk application exited with a failure status")]
    ExitFailure,
}
