//! Frame codec for the bridge.
//!
//! Every message crossing the boundary is a self-describing JSON object; success and failure are
//! told apart by the envelope's `status` tag, never by inspecting the payload.

use serde::de::DeserializeOwned;
use serde::Serialize;

pub type Frame = String;

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("encode frame: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("decode frame: {0}")]
    Decode(#[source] serde_json::Error),
}

pub fn encode<T: Serialize>(msg: &T) -> Result<Frame, WireError> {
    serde_json::to_string(msg).map_err(WireError::Encode)
}

pub fn decode<T: DeserializeOwned>(frame: &str) -> Result<T, WireError> {
    serde_json::from_str(frame).map_err(WireError::Decode)
}
