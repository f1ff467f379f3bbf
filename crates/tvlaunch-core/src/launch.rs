//! Launch request builder.
//!
//! Turns a canonical play or playlist request plus a resolved player profile
//! into a [`LaunchDescriptor`]. Building is pure: nothing here talks to the host.

use tracing::debug;
use tvlaunch_profiles::{ExtraField, PlayerProfile, PlaylistConvention};

use crate::error::TvLaunchError;
use crate::models::{
    ExtraValue, Extras, LaunchAction, LaunchDescriptor, LaunchFlags, PlayRequest, PlaylistRequest,
};

/// MIME type for single videos and typed-array playlists.
pub const VIDEO_MIME: &str = "video/*";

/// Extra asking a targeted player to hand its position back.
pub const RETURN_RESULT_KEY: &str = "return_result";

/// Build the descriptor for a single video.
pub fn build_single(
    req: &PlayRequest,
    profile: &PlayerProfile,
) -> Result<LaunchDescriptor, TvLaunchError> {
    req.validate()?;
    let descriptor = single_item(&req.url, &req.title, req.start_position, profile);
    log_built(&descriptor, profile);
    Ok(descriptor)
}

/// Build the descriptor for a playlist.
///
/// Players without playlist support get a single-item launch of
/// `urls[start_index]`; the rest of the list is dropped.
pub fn build_playlist(
    req: &PlaylistRequest,
    profile: &PlayerProfile,
) -> Result<LaunchDescriptor, TvLaunchError> {
    let start = req.validate()?;
    let primary = &req.urls[start];

    let convention = match profile.playlist() {
        Some(c) => c,
        None => {
            debug!(
                player = %profile.name,
                start_index = start,
                "Player has no playlist support, launching single item"
            );
            let descriptor = single_item(primary, &req.title, req.start_position, profile);
            log_built(&descriptor, profile);
            return Ok(descriptor);
        }
    };

    let mime = match convention {
        PlaylistConvention::ParallelStrings => profile
            .playlist_mime
            .clone()
            .unwrap_or_else(|| VIDEO_MIME.to_string()),
        PlaylistConvention::TypedArray => VIDEO_MIME.to_string(),
    };

    let mut descriptor = player_descriptor(primary, mime, profile);
    let extras = &mut descriptor.extras;
    attach_hints(extras, profile, &req.title);

    let names = req.entry_names();
    if let Some(key) = profile.key(ExtraField::PlaylistUrls) {
        let urls = req.urls.clone();
        let value = match convention {
            PlaylistConvention::ParallelStrings => ExtraValue::StrArray(urls),
            PlaylistConvention::TypedArray => ExtraValue::UriArray(urls),
        };
        extras.insert(key, value);
    }
    if let Some(key) = profile.key(ExtraField::PlaylistNames) {
        extras.insert(key, ExtraValue::StrArray(names.clone()));
    }
    if let Some(key) = profile.key(ExtraField::PlaylistFilenames) {
        extras.insert(key, ExtraValue::StrArray(names));
    }
    if let Some(key) = profile.key(ExtraField::PlaylistExplicit) {
        extras.insert(key, true);
    }

    attach_resume(extras, profile, ExtraField::StartIndex, req.start_index);
    attach_resume(extras, profile, ExtraField::ResumePosition, req.start_position);

    log_built(&descriptor, profile);
    Ok(descriptor)
}

fn single_item(
    url: &str,
    title: &str,
    start_position: i64,
    profile: &PlayerProfile,
) -> LaunchDescriptor {
    let mut descriptor = player_descriptor(url, VIDEO_MIME.to_string(), profile);
    attach_hints(&mut descriptor.extras, profile, title);
    attach_resume(
        &mut descriptor.extras,
        profile,
        ExtraField::ResumePosition,
        start_position,
    );
    descriptor
}

/// View descriptor with navigation flags, target and the common extras.
fn player_descriptor(url: &str, mime: String, profile: &PlayerProfile) -> LaunchDescriptor {
    let mut descriptor = LaunchDescriptor::new(LaunchAction::View, url)
        .with_mime(mime)
        .with_target(profile.target.clone())
        .with_flags(LaunchFlags::PLAYER);
    if profile.target.is_some() {
        descriptor.extras.insert(RETURN_RESULT_KEY, true);
    }
    descriptor
}

/// Title, direct-playback and sticky hints, each only when the player has a key for it.
fn attach_hints(extras: &mut Extras, profile: &PlayerProfile, title: &str) {
    let caps = profile.capabilities;
    if caps.title_override {
        if let Some(key) = profile.key(ExtraField::Title) {
            extras.insert(key, title);
        }
    }
    if caps.direct_playback {
        if let Some(key) = profile.key(ExtraField::DirectPlayback) {
            extras.insert(key, true);
        }
    }
    if let Some(key) = profile.key(ExtraField::Sticky) {
        extras.insert(key, false);
    }
}

/// Resume-style values are sent only when positive: some players read an
/// explicit zero as "restart".
fn attach_resume(extras: &mut Extras, profile: &PlayerProfile, field: ExtraField, value: i64) {
    if !profile.capabilities.resume || value <= 0 {
        return;
    }
    if let Some(key) = profile.key(field) {
        extras.insert(key, value);
    }
}

fn log_built(descriptor: &LaunchDescriptor, profile: &PlayerProfile) {
    debug!(
        player = %profile.name,
        target = ?descriptor.target_package,
        mime = ?descriptor.mime_type,
        extras = descriptor.extras.len(),
        "Built launch descriptor"
    );
}
