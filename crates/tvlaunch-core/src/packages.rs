use tracing::debug;

use crate::error::TvLaunchError;
use crate::host::{HostOs, PackageInfo};

/// Whether a package is installed. A missing package is `Ok(false)`.
pub fn is_installed<H: HostOs + ?Sized>(
    host: &H,
    package_id: &str,
) -> Result<bool, TvLaunchError> {
    let package_id = package_id.trim();
    if package_id.is_empty() {
        return Err(TvLaunchError::Validation("Package name required".into()));
    }
    let installed = host.package_info(package_id).is_some();
    debug!(package = %package_id, installed, "Package presence check");
    Ok(installed)
}

/// Version of the hosting app itself.
pub fn app_version<H: HostOs + ?Sized>(host: &H) -> Result<PackageInfo, TvLaunchError> {
    let own = host.own_package();
    host.package_info(&own)
        .ok_or_else(|| TvLaunchError::NotFound(format!("Cannot read package info for {own}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;

    fn host() -> RecordingHost {
        RecordingHost::new("com.torserve.pwa")
            .with_package(
                "net.gtvbox.videoplayer",
                PackageInfo {
                    version_name: "9.9".into(),
                    version_code: 99,
                },
            )
            .with_package(
                "com.torserve.pwa",
                PackageInfo {
                    version_name: "1.4.0".into(),
                    version_code: 10_400,
                },
            )
    }

    #[test]
    fn test_installed() {
        assert!(is_installed(&host(), "net.gtvbox.videoplayer").unwrap());
    }

    #[test]
    fn test_missing_is_false() {
        assert!(!is_installed(&host(), "org.videolan.vlc").unwrap());
    }

    #[test]
    fn test_empty_is_validation_error() {
        assert!(matches!(
            is_installed(&host(), ""),
            Err(TvLaunchError::Validation(_))
        ));
    }

    #[test]
    fn test_app_version() {
        let v = app_version(&host()).unwrap();
        assert_eq!(v.version_name, "1.4.0");
        assert_eq!(v.version_code, 10_400);
    }

    #[test]
    fn test_app_version_missing() {
        let host = host().without_package("com.torserve.pwa");
        assert!(matches!(app_version(&host), Err(TvLaunchError::NotFound(_))));
    }
}
