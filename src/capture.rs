//! Captured call snapshots
//!
//! A sampled invocation is persisted as a [`CapturedCall`]: the ordered
//! positional values plus a name-to-value mapping, both held as
//! self-describing JSON values so arbitrarily structured arguments survive
//! the trip to disk and back.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{RecorderError, Result};

/// Snapshot of one call's arguments at the moment of capture
///
/// Serialized with exactly two named fields, `args` and `kwargs`, so
/// offline tooling can reconstruct both without schema knowledge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapturedCall {
    /// Positional argument values, in call order
    pub args: Vec<Value>,
    /// Named argument values, keyed by parameter name
    pub kwargs: BTreeMap<String, Value>,
}

impl CapturedCall {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument value
    pub fn arg(mut self, value: impl Serialize) -> Result<Self> {
        let value =
            serde_json::to_value(value).map_err(|e| RecorderError::CaptureError(e.to_string()))?;
        self.args.push(value);
        Ok(self)
    }

    /// Add a named argument value
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Serialize) -> Result<Self> {
        let value =
            serde_json::to_value(value).map_err(|e| RecorderError::CaptureError(e.to_string()))?;
        self.kwargs.insert(name.into(), value);
        Ok(self)
    }

    /// True if the snapshot holds no values at all
    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.kwargs.is_empty()
    }
}

/// Conversion of an argument pack into a [`CapturedCall`]
///
/// Implemented for tuples of serializable values (positional capture) and
/// for [`CapturedCall`] itself, so callers that need named arguments can
/// build the snapshot explicitly and pass it through unchanged.
pub trait Capture {
    /// Snapshot the argument pack
    ///
    /// Capture is fallible: an argument whose `Serialize` impl errors (a
    /// map with non-string keys, a poisoned cell) surfaces here rather
    /// than aborting the wrapped call.
    fn capture(&self) -> Result<CapturedCall>;
}

impl Capture for CapturedCall {
    fn capture(&self) -> Result<CapturedCall> {
        Ok(self.clone())
    }
}

macro_rules! impl_tuple_capture {
    ($($idx:tt $name:ident),*) => {
        impl<$($name: Serialize),*> Capture for ($($name,)*) {
            fn capture(&self) -> Result<CapturedCall> {
                #[allow(unused_mut)]
                let mut call = CapturedCall::new();
                $(
                    call.args.push(
                        serde_json::to_value(&self.$idx)
                            .map_err(|e| RecorderError::CaptureError(e.to_string()))?,
                    );
                )*
                Ok(call)
            }
        }
    };
}

impl_tuple_capture!();
impl_tuple_capture!(0 A0);
impl_tuple_capture!(0 A0, 1 A1);
impl_tuple_capture!(0 A0, 1 A1, 2 A2);
impl_tuple_capture!(0 A0, 1 A1, 2 A2, 3 A3);
impl_tuple_capture!(0 A0, 1 A1, 2 A2, 3 A3, 4 A4);
impl_tuple_capture!(0 A0, 1 A1, 2 A2, 3 A3, 4 A4, 5 A5);
impl_tuple_capture!(0 A0, 1 A1, 2 A2, 3 A3, 4 A4, 5 A5, 6 A6);
impl_tuple_capture!(0 A0, 1 A1, 2 A2, 3 A3, 4 A4, 5 A5, 6 A6, 7 A7);
