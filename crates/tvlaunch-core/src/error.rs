use thiserror::Error;

use crate::host::HostError;

#[derive(Debug, Error)]
pub enum TvLaunchError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("launch failed: {0}")]
    LaunchFailure(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<HostError> for TvLaunchError {
    fn from(e: HostError) -> Self {
        TvLaunchError::LaunchFailure(e.to_string())
    }
}

impl From<tvlaunch_profiles::ProfileError> for TvLaunchError {
    fn from(e: tvlaunch_profiles::ProfileError) -> Self {
        TvLaunchError::Config(e.to_string())
    }
}
