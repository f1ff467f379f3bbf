//! Package install flow.
//!
//! `Idle -> PermissionCheck -> (Blocked | Exposing) -> Launching ->
//! (Resolved | FallbackLaunching) -> Done`
//!
//! The flow is fire-and-forget: it succeeds once the installer (or the
//! fallback viewer) has been launched and never waits for the install itself.

use tracing::{debug, info, warn};

use crate::config::InstallConfig;
use crate::error::TvLaunchError;
use crate::host::{HostOs, InstallGate};
use crate::models::{InstallRequest, LaunchAction, LaunchDescriptor, LaunchFlags};

pub const EXTRA_NOT_UNKNOWN_SOURCE: &str = "android.intent.extra.NOT_UNKNOWN_SOURCE";
pub const EXTRA_RETURN_RESULT: &str = "android.intent.extra.RETURN_RESULT";

const PERMISSION_HINT: &str =
    "Install permission not granted. Enable 'Install unknown apps' for this app.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    Idle,
    PermissionCheck,
    Blocked,
    Exposing,
    Launching,
    Resolved,
    FallbackLaunching,
    Done,
}

/// Which launch path handled the install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The dedicated installer action resolved and was launched.
    Installer,
    /// No installer resolved; the archive was opened with a generic viewer.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub outcome: InstallOutcome,
    pub content_uri: String,
    /// Every state the flow passed through, in order.
    pub trace: Vec<InstallState>,
}

pub struct InstallFlow<'a, H: HostOs + ?Sized> {
    host: &'a H,
    settings: &'a InstallConfig,
    state: InstallState,
    trace: Vec<InstallState>,
}

impl<'a, H: HostOs + ?Sized> InstallFlow<'a, H> {
    pub fn new(host: &'a H, settings: &'a InstallConfig) -> Self {
        Self {
            host,
            settings,
            state: InstallState::Idle,
            trace: vec![InstallState::Idle],
        }
    }

    pub fn state(&self) -> InstallState {
        self.state
    }

    pub fn run(mut self, req: &InstallRequest) -> Result<InstallReport, TvLaunchError> {
        self.enter(InstallState::PermissionCheck);
        if self.host.install_gate() == InstallGate::Closed {
            self.enter(InstallState::Blocked);
            self.redirect_to_settings();
            return Err(TvLaunchError::PermissionDenied(PERMISSION_HINT.into()));
        }

        self.enter(InstallState::Exposing);
        let path = &req.local_path;
        if !path.exists() {
            return Err(TvLaunchError::NotFound(format!(
                "APK file not found: {}",
                path.display()
            )));
        }
        let authority = self.settings.authority_for(&self.host.own_package());
        let content_uri = self.host.expose_file(path, &authority)?;

        self.enter(InstallState::Launching);
        let installer = installer_descriptor(&content_uri);
        let outcome = if self.host.can_resolve(&installer) {
            self.enter(InstallState::Resolved);
            self.host.start_activity(&installer)?;
            InstallOutcome::Installer
        } else {
            self.enter(InstallState::FallbackLaunching);
            info!("No installer resolves, opening archive with a viewer");
            let viewer = archive_view_descriptor(&content_uri, &self.settings.archive_mime);
            self.host.start_activity(&viewer)?;
            InstallOutcome::Fallback
        };

        self.enter(InstallState::Done);
        Ok(InstallReport {
            outcome,
            content_uri,
            trace: self.trace,
        })
    }

    fn enter(&mut self, next: InstallState) {
        debug!(from = ?self.state, to = ?next, "Install flow transition");
        self.state = next;
        self.trace.push(next);
    }

    /// Courtesy redirect; a failure here does not change the rejection.
    fn redirect_to_settings(&self) {
        let settings = permission_settings_descriptor(&self.host.own_package());
        warn!("Install permission gate closed, opening settings");
        if let Err(e) = self.host.start_activity(&settings) {
            warn!(error = %e, "Failed to open install permission settings");
        }
    }
}

pub fn installer_descriptor(content_uri: &str) -> LaunchDescriptor {
    let mut descriptor = LaunchDescriptor::new(LaunchAction::InstallPackage, content_uri)
        .with_flags(LaunchFlags::SHARED_FILE);
    descriptor.extras.insert(EXTRA_NOT_UNKNOWN_SOURCE, true);
    descriptor.extras.insert(EXTRA_RETURN_RESULT, true);
    descriptor
}

pub fn archive_view_descriptor(content_uri: &str, archive_mime: &str) -> LaunchDescriptor {
    LaunchDescriptor::new(LaunchAction::View, content_uri)
        .with_mime(archive_mime)
        .with_flags(LaunchFlags::SHARED_FILE)
}

pub fn permission_settings_descriptor(own_package: &str) -> LaunchDescriptor {
    LaunchDescriptor::new(
        LaunchAction::ManageUnknownAppSources,
        format!("package:{own_package}"),
    )
    .with_flags(LaunchFlags::NEW_TASK)
}
