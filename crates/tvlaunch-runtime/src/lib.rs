pub mod bridge;
pub mod logging;
mod pending;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use tvlaunch_core::config::AppConfig;
use tvlaunch_core::install::{InstallFlow, InstallOutcome};
use tvlaunch_core::launch;
use tvlaunch_core::models::{
    EndReason, Extras, InstallRequest, LaunchDescriptor, PlayRequest, PlaybackResult,
    PlaylistRequest,
};
use tvlaunch_core::normalize::Normalizer;
use tvlaunch_core::{packages, CallId, HostOs, TvLaunchError};
use tvlaunch_profiles::ProfileRegistry;

pub use pending::{PendingPlayback, PendingSlot};

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Launch(#[from] TvLaunchError),
    #[error("invalid arguments for {method}: {message}")]
    Arguments { method: String, message: String },
    #[error("unknown method: {0}")]
    UnknownMethod(String),
    #[error("cannot encode reply: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PackageArgs {
    #[serde(default)]
    pub package: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlayArgs {
    #[serde(default)]
    pub url: String,
    pub package: Option<String>,
    pub title: Option<String>,
    pub position: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlayListArgs {
    #[serde(default)]
    pub urls: Vec<String>,
    pub names: Option<Vec<String>>,
    pub package: Option<String>,
    pub title: Option<String>,
    pub start_index: Option<i64>,
    pub position: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InstallArgs {
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledDto {
    pub installed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppVersionDto {
    pub version_name: String,
    pub version_code: i64,
}

/// Player result as handed back to the front-end.
///
/// With data: `{position, duration, endBy, finished}`.
/// Without: `{position: -1, message}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackResultDto {
    pub position: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_by: Option<EndReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<PlaybackResult> for PlaybackResultDto {
    fn from(r: PlaybackResult) -> Self {
        match r.message {
            Some(message) => Self {
                position: -1,
                duration: None,
                end_by: None,
                finished: None,
                message: Some(message),
            },
            None => Self {
                position: r.position,
                duration: Some(r.duration),
                end_by: Some(r.end_reason),
                finished: Some(r.finished),
                message: None,
            },
        }
    }
}

/// Entry point for the front-end bridge.
pub struct Runtime<H: HostOs> {
    host: Arc<H>,
    config: AppConfig,
    registry: ProfileRegistry,
    normalizer: Normalizer,
    pending: PendingSlot,
}

impl<H: HostOs> Runtime<H> {
    /// Build a runtime from the user's config file (or the defaults).
    pub fn new(host: Arc<H>) -> Result<Self, RuntimeError> {
        let config = AppConfig::load().map_err(|e| RuntimeError::Config(e.to_string()))?;
        Self::with_config(host, config)
    }

    pub fn with_config(host: Arc<H>, config: AppConfig) -> Result<Self, RuntimeError> {
        let registry = config
            .players
            .load_registry()
            .map_err(|e| RuntimeError::Config(e.to_string()))?;
        let normalizer = config.playback.normalizer();
        Ok(Self {
            host,
            config,
            registry,
            normalizer,
            pending: PendingSlot::new(),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    pub fn pending_call(&self) -> Option<CallId> {
        self.pending.pending_id()
    }

    pub fn is_package_installed(&self, args: PackageArgs) -> Result<InstalledDto, RuntimeError> {
        let installed = packages::is_installed(self.host.as_ref(), &args.package)?;
        Ok(InstalledDto { installed })
    }

    pub fn play(&self, args: PlayArgs) -> Result<PendingPlayback, RuntimeError> {
        let req = PlayRequest {
            url: args.url,
            package_id: args.package,
            title: args
                .title
                .unwrap_or_else(|| self.config.playback.default_title.clone()),
            start_position: args.position.unwrap_or(0),
        };
        let profile = self.registry.resolve(req.package_id.as_deref());
        let descriptor = launch::build_single(&req, &profile)?;
        self.launch_for_result(descriptor)
    }

    pub fn play_list(&self, args: PlayListArgs) -> Result<PendingPlayback, RuntimeError> {
        let req = PlaylistRequest {
            urls: args.urls,
            names: args.names.unwrap_or_default(),
            package_id: args.package,
            title: args
                .title
                .unwrap_or_else(|| self.config.playback.default_playlist_title.clone()),
            start_index: args.start_index.unwrap_or(0),
            start_position: args.position.unwrap_or(0),
        };
        let profile = self.registry.resolve(req.package_id.as_deref());
        let descriptor = launch::build_playlist(&req, &profile)?;
        self.launch_for_result(descriptor)
    }

    pub fn get_app_version(&self) -> Result<AppVersionDto, RuntimeError> {
        let info = packages::app_version(self.host.as_ref())?;
        Ok(AppVersionDto {
            version_name: info.version_name,
            version_code: info.version_code,
        })
    }

    pub fn install_apk(&self, args: InstallArgs) -> Result<InstallOutcome, RuntimeError> {
        let req = InstallRequest::parse(&args.path)?;
        let report = InstallFlow::new(self.host.as_ref(), &self.config.install).run(&req)?;
        info!(
            path = %req.local_path.display(),
            outcome = ?report.outcome,
            "Package installer launched"
        );
        Ok(report.outcome)
    }

    /// Inbound result from the host for a launched player.
    ///
    /// Returns `false` when `call_id` is not the pending call.
    pub fn deliver_result(&self, call_id: CallId, extras: Option<Extras>) -> bool {
        let result = self.normalizer.normalize(extras.as_ref());
        self.pending.fulfill(call_id, result)
    }

    fn launch_for_result(
        &self,
        descriptor: LaunchDescriptor,
    ) -> Result<PendingPlayback, RuntimeError> {
        let pending = self.pending.launch(|call_id| {
            self.host
                .start_activity_for_result(call_id, &descriptor)
                .map_err(TvLaunchError::from)
        })?;
        info!(
            call_id = %pending.call_id(),
            target = ?descriptor.target_package,
            uri = %descriptor.data_uri,
            "Player launched"
        );
        Ok(pending)
    }
}
