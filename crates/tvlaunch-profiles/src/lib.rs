pub mod profile;
pub mod registry;

pub use profile::{
    Capabilities, ExtraField, ExtraKeys, PlayerDef, PlayerProfile, PlaylistConvention, ProfileKind,
};
pub use registry::{ProfileError, ProfileRegistry};
