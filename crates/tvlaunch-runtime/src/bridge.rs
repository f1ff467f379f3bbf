//! Method-name dispatch for the front-end bridge.
//!
//! The transport that carries calls in and replies out lives elsewhere; this
//! module maps `(method, JSON args)` onto [`Runtime`] and shapes the replies.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use tvlaunch_core::HostOs;

use crate::{PendingPlayback, PlaybackResultDto, Runtime, RuntimeError};

/// Reply to a bridge call.
#[derive(Debug)]
pub enum BridgeReply {
    /// Resolve immediately with a value.
    Resolved(Value),
    /// Resolve immediately with no value.
    Empty,
    /// Resolve once the launched player reports back.
    Pending(PendingPlayback),
}

impl BridgeReply {
    /// Wait for the final JSON value. `None` for empty replies.
    pub async fn resolve(self) -> Result<Option<Value>, RuntimeError> {
        match self {
            Self::Resolved(v) => Ok(Some(v)),
            Self::Empty => Ok(None),
            Self::Pending(p) => {
                let dto = PlaybackResultDto::from(p.wait().await);
                let value =
                    serde_json::to_value(dto).map_err(|e| RuntimeError::Encode(e.to_string()))?;
                Ok(Some(value))
            }
        }
    }
}

impl<H: HostOs> Runtime<H> {
    pub fn invoke(&self, method: &str, args: Value) -> Result<BridgeReply, RuntimeError> {
        debug!(method, "Bridge call");
        match method {
            "isPackageInstalled" => {
                resolved(method, self.is_package_installed(parse(method, args)?)?)
            }
            "play" => Ok(BridgeReply::Pending(self.play(parse(method, args)?)?)),
            "playList" => Ok(BridgeReply::Pending(self.play_list(parse(method, args)?)?)),
            "getAppVersion" => resolved(method, self.get_app_version()?),
            "installApk" => {
                self.install_apk(parse(method, args)?)?;
                Ok(BridgeReply::Empty)
            }
            other => Err(RuntimeError::UnknownMethod(other.to_string())),
        }
    }
}

fn parse<T: DeserializeOwned>(method: &str, args: Value) -> Result<T, RuntimeError> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| RuntimeError::Arguments {
        method: method.to_string(),
        message: e.to_string(),
    })
}

fn resolved<T: Serialize>(method: &str, value: T) -> Result<BridgeReply, RuntimeError> {
    serde_json::to_value(value)
        .map(BridgeReply::Resolved)
        .map_err(|e| RuntimeError::Encode(format!("{method}: {e}")))
}
