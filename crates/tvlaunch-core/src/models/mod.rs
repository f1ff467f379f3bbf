pub mod descriptor;
pub mod request;
pub mod result;

pub use descriptor::{ExtraValue, Extras, LaunchAction, LaunchDescriptor, LaunchFlags};
pub use request::{InstallRequest, PlayRequest, PlaylistRequest};
pub use result::{EndReason, PlaybackResult};
