use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::profile::{PlayerDef, PlayerProfile, PlaylistConvention};

/// Embedded player database.
const EMBEDDED_DB: &str = include_str!("../data/players.toml");

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("player database parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid player definition '{name}': {reason}")]
    Invalid { name: String, reason: String },
}

/// Wrapper for TOML deserialization.
#[derive(Debug, Deserialize)]
struct PlayerDbFile {
    #[serde(rename = "player", default)]
    players: Vec<PlayerDef>,
}

/// Registry of known external players, resolved by package id.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    players: Vec<PlayerDef>,
}

impl ProfileRegistry {
    /// Create an empty registry. Every non-empty package resolves to pass-through.
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
        }
    }

    /// Load the embedded player database.
    pub fn embedded() -> Self {
        Self::from_toml(EMBEDDED_DB).expect("embedded players.toml should be valid")
    }

    /// Load a player database from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ProfileError> {
        let db: PlayerDbFile = toml::from_str(toml_str)?;
        for def in &db.players {
            validate(def)?;
        }
        Ok(Self {
            players: db.players,
        })
    }

    /// Merge a user database into this one.
    /// Players with matching names are replaced; new players are appended.
    pub fn merge_user(&mut self, user_db: &ProfileRegistry) {
        for user_player in &user_db.players {
            if let Some(existing) = self.players.iter_mut().find(|p| p.name == user_player.name) {
                *existing = user_player.clone();
            } else {
                self.players.push(user_player.clone());
            }
        }
    }

    /// Resolve the profile for a package id.
    ///
    /// `None` or an empty id yields the generic profile (bare view request);
    /// an id matching no enabled definition yields a pass-through profile.
    pub fn resolve(&self, package_id: Option<&str>) -> PlayerProfile {
        let package_id = match package_id.map(str::trim) {
            Some(p) if !p.is_empty() => p,
            _ => {
                debug!("No package given, using generic profile");
                return PlayerProfile::generic();
            }
        };

        match self.find_by_package(package_id) {
            Some(def) => {
                debug!(package = %package_id, player = %def.name, "Resolved player profile");
                PlayerProfile::from_def(def, package_id)
            }
            None => {
                debug!(package = %package_id, "Unknown package, using pass-through profile");
                PlayerProfile::pass_through(package_id)
            }
        }
    }

    /// Find the first enabled definition whose fragments match the package id.
    pub fn find_by_package(&self, package_id: &str) -> Option<&PlayerDef> {
        self.players
            .iter()
            .find(|p| p.enabled && p.matches(package_id))
    }

    /// Get all enabled players.
    pub fn enabled_players(&self) -> impl Iterator<Item = &PlayerDef> {
        self.players.iter().filter(|p| p.enabled)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(def: &PlayerDef) -> Result<(), ProfileError> {
    let invalid = |reason: &str| ProfileError::Invalid {
        name: def.name.clone(),
        reason: reason.to_string(),
    };

    if def.fragments.is_empty() || def.fragments.iter().any(|f| f.trim().is_empty()) {
        return Err(invalid("fragments must be non-empty strings"));
    }
    if def.capabilities.playlist {
        match def.playlist_convention {
            None => return Err(invalid("playlist support needs a playlist_convention")),
            Some(PlaylistConvention::ParallelStrings) if def.playlist_mime.is_none() => {
                return Err(invalid("parallel_strings playlists need a playlist_mime"));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ExtraField, ProfileKind};

    #[test]
    fn test_embedded_loads() {
        let db = ProfileRegistry::embedded();
        assert_eq!(db.len(), 3, "Expected 3 players, got {}", db.len());
    }

    #[test]
    fn test_resolve_none_is_generic() {
        let db = ProfileRegistry::embedded();
        assert_eq!(db.resolve(None).kind, ProfileKind::Generic);
        assert_eq!(db.resolve(Some("")).kind, ProfileKind::Generic);
        assert_eq!(db.resolve(Some("  ")).kind, ProfileKind::Generic);
    }

    #[test]
    fn test_resolve_vimu() {
        let db = ProfileRegistry::embedded();
        let p = db.resolve(Some("net.gtvbox.videoplayer"));
        assert_eq!(p.name, "Vimu");
        assert_eq!(p.kind, ProfileKind::Known);
        assert_eq!(p.target.as_deref(), Some("net.gtvbox.videoplayer"));
        assert_eq!(p.key(ExtraField::ResumePosition), Some("startfrom"));
        assert_eq!(p.playlist(), Some(PlaylistConvention::ParallelStrings));
    }

    #[test]
    fn test_resolve_mx_variants() {
        let db = ProfileRegistry::embedded();
        for pkg in ["com.mxtech.videoplayer.ad", "com.mxtech.videoplayer.pro"] {
            let p = db.resolve(Some(pkg));
            assert_eq!(p.name, "MX Player");
            assert_eq!(p.key(ExtraField::ResumePosition), Some("position"));
            assert_eq!(p.playlist(), Some(PlaylistConvention::TypedArray));
        }
    }

    #[test]
    fn test_resolve_vlc_is_minimal() {
        let db = ProfileRegistry::embedded();
        let p = db.resolve(Some("org.videolan.vlc"));
        assert_eq!(p.name, "VLC");
        assert!(!p.capabilities.resume);
        assert!(!p.capabilities.playlist);
        assert_eq!(p.key(ExtraField::Title), Some("title"));
        assert_eq!(p.key(ExtraField::ResumePosition), None);
    }

    #[test]
    fn test_resolve_unknown_is_pass_through() {
        let db = ProfileRegistry::embedded();
        let p = db.resolve(Some("com.example.player"));
        assert_eq!(p.kind, ProfileKind::PassThrough);
        assert_eq!(p.target.as_deref(), Some("com.example.player"));
        assert!(p.extra_keys.is_empty());
    }

    #[test]
    fn test_merge_user() {
        let mut db = ProfileRegistry::embedded();
        let original_count = db.len();

        let user_toml = r#"
            [[player]]
            name = "VLC"
            fragments = ["videolan"]
            enabled = false

            [[player]]
            name = "Just Player"
            fragments = ["justplayer"]

            [player.capabilities]
            resume = true

            [player.extras]
            resume_position = "position"
        "#;
        let user_db = ProfileRegistry::from_toml(user_toml).unwrap();
        db.merge_user(&user_db);

        // VLC should be disabled now.
        assert_eq!(
            db.resolve(Some("org.videolan.vlc")).kind,
            ProfileKind::PassThrough
        );

        assert_eq!(db.len(), original_count + 1);
        let custom = db.resolve(Some("com.brouken.player.justplayer"));
        assert_eq!(custom.name, "Just Player");
        assert!(custom.capabilities.resume);
    }

    #[test]
    fn test_rejects_empty_fragment() {
        let toml = r#"
            [[player]]
            name = "Broken"
            fragments = [""]
        "#;
        assert!(matches!(
            ProfileRegistry::from_toml(toml),
            Err(ProfileError::Invalid { .. })
        ));
    }

    #[test]
    fn test_rejects_playlist_without_convention() {
        let toml = r#"
            [[player]]
            name = "Broken"
            fragments = ["broken"]

            [player.capabilities]
            playlist = true
        "#;
        assert!(matches!(
            ProfileRegistry::from_toml(toml),
            Err(ProfileError::Invalid { .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_extra_field() {
        let toml = r#"
            [[player]]
            name = "Typo"
            fragments = ["typo"]

            [player.extras]
            resume_postion = "position"
        "#;
        assert!(matches!(
            ProfileRegistry::from_toml(toml),
            Err(ProfileError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(matches!(
            ProfileRegistry::from_toml("[[player]\nname ="),
            Err(ProfileError::Parse(_))
        ));
    }
}
