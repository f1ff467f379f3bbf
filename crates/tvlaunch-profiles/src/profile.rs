use serde::{Deserialize, Serialize};

/// Canonical launch fields that a player may know under its own extra key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtraField {
    /// Display title shown instead of the raw URL.
    Title,
    /// Hint to open the stream directly, without local buffering.
    DirectPlayback,
    /// Resume offset in seconds.
    ResumePosition,
    /// Index of the first playlist entry to play.
    StartIndex,
    /// Keep playing in the background once the player loses focus. Always sent as `false`.
    Sticky,
    /// Playlist URLs.
    PlaylistUrls,
    /// Display names for the playlist entries.
    PlaylistNames,
    /// File names for the playlist entries.
    PlaylistFilenames,
    /// Marks the playlist as an explicit, user-ordered list.
    PlaylistExplicit,
}

/// Canonical field -> player-specific extra key. Unset fields are never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtraKeys {
    pub title: Option<String>,
    pub direct_playback: Option<String>,
    pub resume_position: Option<String>,
    pub start_index: Option<String>,
    pub sticky: Option<String>,
    pub playlist_urls: Option<String>,
    pub playlist_names: Option<String>,
    pub playlist_filenames: Option<String>,
    pub playlist_explicit: Option<String>,
}

impl ExtraKeys {
    pub fn get(&self, field: ExtraField) -> Option<&str> {
        let key = match field {
            ExtraField::Title => &self.title,
            ExtraField::DirectPlayback => &self.direct_playback,
            ExtraField::ResumePosition => &self.resume_position,
            ExtraField::StartIndex => &self.start_index,
            ExtraField::Sticky => &self.sticky,
            ExtraField::PlaylistUrls => &self.playlist_urls,
            ExtraField::PlaylistNames => &self.playlist_names,
            ExtraField::PlaylistFilenames => &self.playlist_filenames,
            ExtraField::PlaylistExplicit => &self.playlist_explicit,
        };
        key.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Capability set of one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub playlist: bool,
    #[serde(default)]
    pub resume: bool,
    #[serde(default)]
    pub title_override: bool,
    #[serde(default)]
    pub direct_playback: bool,
}

impl Capabilities {
    pub const NONE: Capabilities = Capabilities {
        playlist: false,
        resume: false,
        title_override: false,
        direct_playback: false,
    };
}

/// How a player expects a playlist to be handed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistConvention {
    /// Parallel arrays of strings (URLs and names) with a dedicated playlist MIME type.
    ParallelStrings,
    /// A typed URI array next to the `video/*` primary payload.
    TypedArray,
}

/// Definition of an external player as stored in the player database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDef {
    /// Display name (e.g., "Vimu", "MX Player").
    pub name: String,
    /// Package id fragments, matched as case-insensitive substrings.
    pub fragments: Vec<String>,
    #[serde(default)]
    pub capabilities: Capabilities,
    #[serde(default)]
    pub playlist_convention: Option<PlaylistConvention>,
    /// MIME type for `parallel_strings` playlists.
    #[serde(default)]
    pub playlist_mime: Option<String>,
    #[serde(default)]
    pub extras: ExtraKeys,
    /// Whether this player takes part in resolution.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl PlayerDef {
    /// Case-insensitive substring test against a package id.
    pub fn matches(&self, package_id: &str) -> bool {
        let package_lower = package_id.to_lowercase();
        self.fragments
            .iter()
            .any(|f| package_lower.contains(&f.to_lowercase()))
    }
}

/// Which branch of the registry produced a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    /// No package given: let the OS pick a viewer.
    Generic,
    /// Named package with no matching definition.
    PassThrough,
    /// Named package matched a known player.
    Known,
}

/// A resolved profile, ready to drive the launch builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProfile {
    pub name: String,
    pub kind: ProfileKind,
    /// Package to target explicitly. `None` for the generic profile.
    pub target: Option<String>,
    pub capabilities: Capabilities,
    pub playlist_convention: Option<PlaylistConvention>,
    pub playlist_mime: Option<String>,
    pub extra_keys: ExtraKeys,
}

impl PlayerProfile {
    pub fn generic() -> Self {
        Self {
            name: "Generic".into(),
            kind: ProfileKind::Generic,
            target: None,
            capabilities: Capabilities::NONE,
            playlist_convention: None,
            playlist_mime: None,
            extra_keys: ExtraKeys::default(),
        }
    }

    pub fn pass_through(package_id: &str) -> Self {
        Self {
            name: package_id.to_string(),
            kind: ProfileKind::PassThrough,
            target: Some(package_id.to_string()),
            ..Self::generic()
        }
    }

    pub fn from_def(def: &PlayerDef, package_id: &str) -> Self {
        Self {
            name: def.name.clone(),
            kind: ProfileKind::Known,
            target: Some(package_id.to_string()),
            capabilities: def.capabilities,
            playlist_convention: def.playlist_convention,
            playlist_mime: def.playlist_mime.clone(),
            extra_keys: def.extras.clone(),
        }
    }

    /// The player's key for a canonical field, if it understands that field.
    pub fn key(&self, field: ExtraField) -> Option<&str> {
        self.extra_keys.get(field)
    }

    /// Playlist convention, only when the player actually supports playlists.
    pub fn playlist(&self) -> Option<PlaylistConvention> {
        if self.capabilities.playlist {
            self.playlist_convention
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(fragments: &[&str]) -> PlayerDef {
        PlayerDef {
            name: "Test".into(),
            fragments: fragments.iter().map(|s| s.to_string()).collect(),
            capabilities: Capabilities::default(),
            playlist_convention: None,
            playlist_mime: None,
            extras: ExtraKeys::default(),
            enabled: true,
        }
    }

    #[test]
    fn test_matches_substring_case_insensitive() {
        let d = def(&["gtvbox"]);
        assert!(d.matches("net.gtvbox.videoplayer"));
        assert!(d.matches("NET.GTVBOX.VIDEOPLAYER"));
        assert!(!d.matches("org.videolan.vlc"));
    }

    #[test]
    fn test_extra_keys_lookup() {
        let keys = ExtraKeys {
            resume_position: Some("startfrom".into()),
            ..Default::default()
        };
        assert_eq!(keys.get(ExtraField::ResumePosition), Some("startfrom"));
        assert_eq!(keys.get(ExtraField::Title), None);
        assert!(!keys.is_empty());
        assert!(ExtraKeys::default().is_empty());
    }

    #[test]
    fn test_generic_profile_has_nothing() {
        let p = PlayerProfile::generic();
        assert_eq!(p.target, None);
        assert_eq!(p.capabilities, Capabilities::NONE);
        assert!(p.extra_keys.is_empty());
        assert_eq!(p.playlist(), None);
    }

    #[test]
    fn test_pass_through_targets_package() {
        let p = PlayerProfile::pass_through("com.example.player");
        assert_eq!(p.kind, ProfileKind::PassThrough);
        assert_eq!(p.target.as_deref(), Some("com.example.player"));
        assert!(p.extra_keys.is_empty());
    }

    #[test]
    fn test_playlist_requires_capability() {
        let mut d = def(&["x"]);
        d.playlist_convention = Some(PlaylistConvention::TypedArray);
        let p = PlayerProfile::from_def(&d, "x");
        assert_eq!(p.playlist(), None);

        d.capabilities.playlist = true;
        let p = PlayerProfile::from_def(&d, "x");
        assert_eq!(p.playlist(), Some(PlaylistConvention::TypedArray));
    }
}
