//! Pluggable sample serialization
//!
//! Each sample store encodes its slot blobs with exactly one codec, named
//! in the store manifest so the inspector can pick the matching decoder.
//! JSON is the default (greppable, diff-friendly); MessagePack trades
//! readability for size when argument payloads are large.

use crate::capture::CapturedCall;
use crate::error::{RecorderError, Result};

/// Serialization strategy for persisted samples
pub trait SampleCodec: Send + Sync {
    /// Codec name as recorded in the store manifest
    fn name(&self) -> &'static str;

    /// Encode a captured call into a slot blob
    fn encode(&self, call: &CapturedCall) -> Result<Vec<u8>>;

    /// Decode a slot blob back into a captured call
    fn decode(&self, bytes: &[u8]) -> Result<CapturedCall>;
}

/// Human-readable JSON codec (default)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl SampleCodec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, call: &CapturedCall) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(call).map_err(|e| RecorderError::EncodeError(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<CapturedCall> {
        serde_json::from_slice(bytes).map_err(|e| RecorderError::DecodeError(e.to_string()))
    }
}

/// Compact MessagePack codec
///
/// Encodes with named fields so blobs stay self-describing.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgpackCodec;

impl SampleCodec for MsgpackCodec {
    fn name(&self) -> &'static str {
        "msgpack"
    }

    fn encode(&self, call: &CapturedCall) -> Result<Vec<u8>> {
        rmp_serde::to_vec_named(call).map_err(|e| RecorderError::EncodeError(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<CapturedCall> {
        rmp_serde::from_slice(bytes).map_err(|e| RecorderError::DecodeError(e.to_string()))
    }
}

/// Resolve a codec by its manifest name
pub fn codec_by_name(name: &str) -> Option<Box<dyn SampleCodec>> {
    match name {
        "json" => Some(Box::new(JsonCodec)),
        "msgpack" => Some(Box::new(MsgpackCodec)),
        _ => None,
    }
}
