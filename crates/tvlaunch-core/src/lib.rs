pub mod config;
pub mod error;
pub mod host;
pub mod install;
pub mod launch;
pub mod models;
pub mod normalize;
pub mod packages;

pub use error::TvLaunchError;
pub use host::{CallId, HostError, HostOs, InstallGate, PackageInfo};
