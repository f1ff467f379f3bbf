//! Host OS surface.
//!
//! Everything the launcher needs from the platform goes through [`HostOs`],
//! so the builder, normalizer and install flow stay platform-agnostic.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use serde::Serialize;
use thiserror::Error;

use crate::models::{LaunchAction, LaunchDescriptor};

/// Opaque identifier tying a launched player to its eventual result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CallId(pub u64);

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "call-{}", self.0)
    }
}

/// Errors reported by the host when it cannot honour a request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("no activity found to handle {0}")]
    NoActivity(String),

    #[error("{0}")]
    Os(String),
}

/// State of the platform's "install unknown apps" gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallGate {
    /// Platform version does not gate package installs.
    NotEnforced,
    Open,
    Closed,
}

/// Catalog entry for an installed package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageInfo {
    pub version_name: String,
    pub version_code: i64,
}

/// The host platform as seen by the launcher.
pub trait HostOs: Send + Sync {
    /// Package id of the hosting app.
    fn own_package(&self) -> String;

    /// Look up a package in the catalog. `None` when it is not installed.
    fn package_info(&self, package_id: &str) -> Option<PackageInfo>;

    /// Fire-and-forget launch.
    fn start_activity(&self, descriptor: &LaunchDescriptor) -> Result<(), HostError>;

    /// Launch and report the activity's result later for `call_id`.
    fn start_activity_for_result(
        &self,
        call_id: CallId,
        descriptor: &LaunchDescriptor,
    ) -> Result<(), HostError>;

    /// Whether any installed activity can handle the descriptor.
    fn can_resolve(&self, descriptor: &LaunchDescriptor) -> bool;

    fn install_gate(&self) -> InstallGate;

    /// Expose a local file as a content reference readable by other apps.
    fn expose_file(&self, path: &Path, authority: &str) -> Result<String, HostError>;
}

/// A launch seen by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedLaunch {
    pub call_id: Option<CallId>,
    pub descriptor: LaunchDescriptor,
}

/// In-memory host that records launches instead of performing them.
///
/// Used for dry runs and tests.
#[derive(Debug)]
pub struct RecordingHost {
    own_package: String,
    packages: HashMap<String, PackageInfo>,
    unresolvable: HashSet<LaunchAction>,
    gate: InstallGate,
    fail_launches: Option<HostError>,
    launches: Mutex<Vec<RecordedLaunch>>,
}

impl RecordingHost {
    pub fn new(own_package: impl Into<String>) -> Self {
        let own_package = own_package.into();
        let mut packages = HashMap::new();
        packages.insert(
            own_package.clone(),
            PackageInfo {
                version_name: "0.0.0".into(),
                version_code: 0,
            },
        );
        Self {
            own_package,
            packages,
            unresolvable: HashSet::new(),
            gate: InstallGate::NotEnforced,
            fail_launches: None,
            launches: Mutex::new(Vec::new()),
        }
    }

    pub fn with_package(mut self, package_id: impl Into<String>, info: PackageInfo) -> Self {
        self.packages.insert(package_id.into(), info);
        self
    }

    pub fn without_package(mut self, package_id: &str) -> Self {
        self.packages.remove(package_id);
        self
    }

    pub fn with_gate(mut self, gate: InstallGate) -> Self {
        self.gate = gate;
        self
    }

    /// Make `can_resolve` report `false` for an action.
    pub fn unresolvable(mut self, action: LaunchAction) -> Self {
        self.unresolvable.insert(action);
        self
    }

    /// Make every launch fail with `error`.
    pub fn failing(mut self, error: HostError) -> Self {
        self.fail_launches = Some(error);
        self
    }

    /// Snapshot of all recorded launches, oldest first.
    pub fn launches(&self) -> Vec<RecordedLaunch> {
        self.launches
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn record(
        &self,
        call_id: Option<CallId>,
        descriptor: &LaunchDescriptor,
    ) -> Result<(), HostError> {
        if let Some(err) = &self.fail_launches {
            return Err(err.clone());
        }
        self.launches
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(RecordedLaunch {
                call_id,
                descriptor: descriptor.clone(),
            });
        Ok(())
    }
}

impl HostOs for RecordingHost {
    fn own_package(&self) -> String {
        self.own_package.clone()
    }

    fn package_info(&self, package_id: &str) -> Option<PackageInfo> {
        self.packages.get(package_id).cloned()
    }

    fn start_activity(&self, descriptor: &LaunchDescriptor) -> Result<(), HostError> {
        self.record(None, descriptor)
    }

    fn start_activity_for_result(
        &self,
        call_id: CallId,
        descriptor: &LaunchDescriptor,
    ) -> Result<(), HostError> {
        self.record(Some(call_id), descriptor)
    }

    fn can_resolve(&self, descriptor: &LaunchDescriptor) -> bool {
        !self.unresolvable.contains(&descriptor.action)
    }

    fn install_gate(&self) -> InstallGate {
        self.gate
    }

    fn expose_file(&self, path: &Path, authority: &str) -> Result<String, HostError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| HostError::Os(format!("cannot expose {}", path.display())))?;
        Ok(format!("content://{authority}/files/{name}"))
    }
}
