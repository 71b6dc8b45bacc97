//! Recuerdo - Reservoir-sampled recorder of real-world function inputs
//!
//! This library wraps arbitrary callables and keeps a statistically
//! unbiased, fixed-size random sample of the arguments they receive over
//! the life of a process, persisting each sampled call for later offline
//! inspection (debugging, fuzzing corpora, regression-test seeding).
//!
//! Recording is opt-in: set `RECUERDO_ENABLED=1` and every wrapped target
//! samples into a unique per-process destination root. Without the flag,
//! wrapped targets behave exactly like the bare functions.
//!
//! ```no_run
//! let parse = recuerdo::record_named("parse", |input: String| input.len(), 32)?;
//! assert_eq!(parse.call(("hello".to_string(),)), 5);
//! # Ok::<(), recuerdo::error::RecorderError>(())
//! ```

pub mod capture;
pub mod cli;
pub mod codec;
pub mod error;
pub mod recorder;
pub mod reservoir;
pub mod store;
pub mod system;

pub use system::{record, record_default, record_named};
