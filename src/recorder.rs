//! Call recorder: wrap one target, sample its arguments, forward the call
//!
//! The wrapper is transparent by contract — return values, errors, and
//! panics from the target pass through verbatim, whether or not the call
//! was sampled. Sampling failures (capture or persistence) are logged and
//! counted, never raised into the caller's path.
//!
//! # Hot Path
//!
//! ```text
//! call(args)
//!   ├─ lock sampler → next_slot() → unlock      (decision, serialized)
//!   ├─ Some(slot): capture args → persist blob   (I/O outside the lock)
//!   └─ invoke target(args) → return verbatim
//! ```

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::capture::{Capture, CapturedCall};
use crate::reservoir::ReservoirSampler;
use crate::store::SampleStore;

/// Invocation of an n-ary target with a tuple argument pack
///
/// Implemented for `Fn` closures and functions of up to eight arguments,
/// preserving the target's return type exactly.
pub trait TargetFn<Args> {
    /// The target's return type
    type Output;

    /// Call the target with the unpacked arguments
    fn invoke(&self, args: Args) -> Self::Output;
}

macro_rules! impl_target_fn {
    ($($name:ident),*) => {
        impl<Func, Out, $($name),*> TargetFn<($($name,)*)> for Func
        where
            Func: Fn($($name),*) -> Out,
        {
            type Output = Out;

            #[allow(non_snake_case)]
            fn invoke(&self, args: ($($name,)*)) -> Out {
                let ($($name,)*) = args;
                (self)($($name),*)
            }
        }
    };
}

impl_target_fn!();
impl_target_fn!(A0);
impl_target_fn!(A0, A1);
impl_target_fn!(A0, A1, A2);
impl_target_fn!(A0, A1, A2, A3);
impl_target_fn!(A0, A1, A2, A3, A4);
impl_target_fn!(A0, A1, A2, A3, A4, A5);
impl_target_fn!(A0, A1, A2, A3, A4, A5, A6);
impl_target_fn!(A0, A1, A2, A3, A4, A5, A6, A7);

/// Targets that consume an explicit snapshot (named-argument capture)
impl<Func, Out> TargetFn<CapturedCall> for Func
where
    Func: Fn(CapturedCall) -> Out,
{
    type Output = Out;

    fn invoke(&self, args: CapturedCall) -> Out {
        (self)(args)
    }
}

/// Snapshot of a recorder's observability counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecorderStats {
    /// Calls observed through the wrapper
    pub calls_seen: u64,
    /// Samples written to the store
    pub samples_persisted: u64,
    /// Arrivals the reservoir chose to discard
    pub samples_discarded: u64,
    /// Capture or persistence failures (call still forwarded)
    pub persist_failures: u64,
}

/// Sampling state carried only by recording wrappers
struct RecorderState {
    sampler: Mutex<ReservoirSampler>,
    store: SampleStore,
    calls_seen: AtomicU64,
    samples_persisted: AtomicU64,
    samples_discarded: AtomicU64,
    persist_failures: AtomicU64,
}

/// A wrapped target callable
///
/// Manufactured by the recording system. When recording is disabled the
/// wrapper carries no sampling state and `call` forwards directly —
/// behaviorally identical to the bare target with zero persistence.
pub struct Recorded<F> {
    target: F,
    state: Option<RecorderState>,
}

impl<F> Recorded<F> {
    /// Pass-through wrapper for a disabled recording system
    pub(crate) fn passthrough(target: F) -> Self {
        Recorded {
            target,
            state: None,
        }
    }

    /// Recording wrapper bound to a sampler and a store
    pub(crate) fn sampled(target: F, sampler: ReservoirSampler, store: SampleStore) -> Self {
        Recorded {
            target,
            state: Some(RecorderState {
                sampler: Mutex::new(sampler),
                store,
                calls_seen: AtomicU64::new(0),
                samples_persisted: AtomicU64::new(0),
                samples_discarded: AtomicU64::new(0),
                persist_failures: AtomicU64::new(0),
            }),
        }
    }

    /// True if this wrapper samples and persists calls
    pub fn is_recording(&self) -> bool {
        self.state.is_some()
    }

    /// Directory holding this recorder's persisted samples, if recording
    pub fn store_dir(&self) -> Option<&Path> {
        self.state.as_ref().map(|s| s.store.dir())
    }

    /// Snapshot the observability counters (all zero when pass-through)
    pub fn stats(&self) -> RecorderStats {
        match &self.state {
            Some(state) => RecorderStats {
                calls_seen: state.calls_seen.load(Ordering::Relaxed),
                samples_persisted: state.samples_persisted.load(Ordering::Relaxed),
                samples_discarded: state.samples_discarded.load(Ordering::Relaxed),
                persist_failures: state.persist_failures.load(Ordering::Relaxed),
            },
            None => RecorderStats::default(),
        }
    }

    /// Invoke the wrapped target, possibly persisting this call's arguments
    ///
    /// The reservoir decision is serialized across threads; blob I/O runs
    /// outside the decision lock since each write touches one slot only.
    /// The target always runs, and its output propagates unchanged.
    pub fn call<Args>(&self, args: Args) -> F::Output
    where
        F: TargetFn<Args>,
        Args: Capture,
    {
        if let Some(state) = &self.state {
            state.calls_seen.fetch_add(1, Ordering::Relaxed);

            let slot = {
                let mut sampler = state
                    .sampler
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                sampler.next_slot()
            };

            match slot {
                Some(slot) => match args.capture() {
                    Ok(snapshot) => match state.store.persist(slot, &snapshot) {
                        Ok(()) => {
                            state.samples_persisted.fetch_add(1, Ordering::Relaxed);
                            debug!(slot, "sampled call persisted");
                        }
                        Err(e) => {
                            state.persist_failures.fetch_add(1, Ordering::Relaxed);
                            warn!(slot, error = %e, "failed to persist sampled call");
                        }
                    },
                    Err(e) => {
                        state.persist_failures.fetch_add(1, Ordering::Relaxed);
                        warn!(slot, error = %e, "failed to capture call arguments");
                    }
                },
                None => {
                    state.samples_discarded.fetch_add(1, Ordering::Relaxed);
                }
            }
        }

        self.target.invoke(args)
    }
}

impl<F> std::fmt::Debug for Recorded<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorded")
            .field("recording", &self.is_recording())
            .finish()
    }
}
