use std::path::PathBuf;

use crate::error::TvLaunchError;

pub const DEFAULT_TITLE: &str = "Video";
pub const DEFAULT_PLAYLIST_TITLE: &str = "Playlist";

const FILE_SCHEME: &str = "file://";

/// Request to play a single URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayRequest {
    pub url: String,
    pub package_id: Option<String>,
    pub title: String,
    /// Resume offset in seconds. Zero or negative means "no preference".
    pub start_position: i64,
}

impl PlayRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            package_id: None,
            title: DEFAULT_TITLE.to_string(),
            start_position: 0,
        }
    }

    pub fn with_package(mut self, package_id: impl Into<String>) -> Self {
        self.package_id = Some(package_id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_start_position(mut self, seconds: i64) -> Self {
        self.start_position = seconds;
        self
    }

    pub fn validate(&self) -> Result<(), TvLaunchError> {
        if self.url.trim().is_empty() {
            return Err(TvLaunchError::Validation("URL is required".into()));
        }
        Ok(())
    }
}

/// Request to play an ordered list of URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRequest {
    pub urls: Vec<String>,
    /// Display names, parallel to `urls`. Missing entries are synthesized.
    pub names: Vec<String>,
    pub package_id: Option<String>,
    pub title: String,
    pub start_index: i64,
    pub start_position: i64,
}

impl PlaylistRequest {
    pub fn new(urls: Vec<String>) -> Self {
        Self {
            urls,
            names: Vec::new(),
            package_id: None,
            title: DEFAULT_PLAYLIST_TITLE.to_string(),
            start_index: 0,
            start_position: 0,
        }
    }

    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.names = names;
        self
    }

    pub fn with_package(mut self, package_id: impl Into<String>) -> Self {
        self.package_id = Some(package_id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_start(mut self, index: i64, position: i64) -> Self {
        self.start_index = index;
        self.start_position = position;
        self
    }

    /// Validate the request and return the start index as a usable offset.
    pub fn validate(&self) -> Result<usize, TvLaunchError> {
        if self.urls.is_empty() {
            return Err(TvLaunchError::Validation("URLs array is required".into()));
        }
        if let Some(i) = self.urls.iter().position(|u| u.trim().is_empty()) {
            return Err(TvLaunchError::Validation(format!(
                "URL at index {i} is empty"
            )));
        }
        match usize::try_from(self.start_index) {
            Ok(i) if i < self.urls.len() => Ok(i),
            _ => Err(TvLaunchError::Validation(format!(
                "startIndex {} out of range for {} URLs",
                self.start_index,
                self.urls.len()
            ))),
        }
    }

    /// One name per URL: given names first, then `"File N"` for the rest.
    pub fn entry_names(&self) -> Vec<String> {
        (0..self.urls.len())
            .map(|i| {
                self.names
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("File {}", i + 1))
            })
            .collect()
    }
}

/// Request to install a local package archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub local_path: PathBuf,
}

impl InstallRequest {
    /// Parse a raw path, stripping a `file://` prefix.
    pub fn parse(raw: &str) -> Result<Self, TvLaunchError> {
        let path = raw.strip_prefix(FILE_SCHEME).unwrap_or(raw);
        if path.trim().is_empty() {
            return Err(TvLaunchError::Validation("Path is required".into()));
        }
        Ok(Self {
            local_path: PathBuf::from(path),
        })
    }
}
