//! Process-wide recording system
//!
//! One gate decides whether instrumentation exists at all. Configuration
//! is read once (environment), frozen on the first `record` call, and the
//! activation banner prints exactly once no matter how many threads race
//! to wrap their first target.
//!
//! # State Machine
//!
//! ```text
//! Unconfigured ──first record()──▶ Active    (enabled,  banner printed)
//!              └─────────────────▶ Inactive  (disabled, silent)
//! ```
//!
//! Both terminal: after the transition every configuration setter fails
//! with [`RecorderError::FrozenConfig`].

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};
use tracing::debug;
use uuid::Uuid;

use crate::codec::{JsonCodec, SampleCodec};
use crate::error::{RecorderError, Result};
use crate::recorder::Recorded;
use crate::reservoir::ReservoirSampler;
use crate::store::SampleStore;

/// Environment flag gating whether recording is active
///
/// Truthy forms (case-insensitive): `true`, `1`, `on`, `yes`. Anything
/// else, or absence, leaves recording disabled.
pub const ENABLED_ENV: &str = "RECUERDO_ENABLED";

/// Environment override for the destination base directory
pub const DIR_ENV: &str = "RECUERDO_DIR";

/// Default reservoir capacity for [`record_default`]
pub const DEFAULT_SAMPLE_SIZE: usize = 32;

const DEFAULT_BASE_DIR: &str = ".recuerdo";

/// Mutable-until-initialized configuration behind the system's one lock
struct SystemState {
    initialized: bool,
    enabled: bool,
    destination_root: PathBuf,
}

/// Process-wide recording gate and recorder factory
///
/// Normally accessed through [`global`] and the free [`record`] functions;
/// standalone instances exist so tests can exercise the lifecycle without
/// touching process-global state.
pub struct RecordingSystem {
    state: Mutex<SystemState>,
    recorder_seq: AtomicU64,
}

impl RecordingSystem {
    /// Build a system from the process environment
    ///
    /// `enabled` comes from [`ENABLED_ENV`]; the destination root is
    /// `<base>/<uuid-v4>` where `base` is [`DIR_ENV`] or `.recuerdo`, so
    /// concurrent process instances never collide on storage.
    pub fn from_env() -> Self {
        let enabled = std::env::var(ENABLED_ENV)
            .map(|v| is_truthy(&v))
            .unwrap_or(false);
        let base = std::env::var(DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_BASE_DIR));
        Self::with_config(enabled, base.join(Uuid::new_v4().to_string()))
    }

    /// Build a system with explicit configuration (test support)
    pub fn with_config(enabled: bool, destination_root: impl Into<PathBuf>) -> Self {
        RecordingSystem {
            state: Mutex::new(SystemState {
                initialized: false,
                enabled,
                destination_root: destination_root.into(),
            }),
            recorder_seq: AtomicU64::new(0),
        }
    }

    /// True once the first `record` call has frozen the configuration
    pub fn is_initialized(&self) -> bool {
        self.lock_state().initialized
    }

    /// Whether instrumentation is active for this process
    pub fn is_enabled(&self) -> bool {
        self.lock_state().enabled
    }

    /// Unique per-process root under which all recorders persist samples
    pub fn destination_root(&self) -> PathBuf {
        self.lock_state().destination_root.clone()
    }

    /// Override the enable flag; fails once the system is initialized
    pub fn set_enabled(&self, enabled: bool) -> Result<()> {
        let mut state = self.lock_state();
        if state.initialized {
            return Err(RecorderError::FrozenConfig("enabled"));
        }
        state.enabled = enabled;
        Ok(())
    }

    /// Override the destination root; fails once the system is initialized
    pub fn set_destination_root(&self, root: impl Into<PathBuf>) -> Result<()> {
        let mut state = self.lock_state();
        if state.initialized {
            return Err(RecorderError::FrozenConfig("destination_root"));
        }
        state.destination_root = root.into();
        Ok(())
    }

    /// Wrap a target callable with reservoir sampling
    ///
    /// The first call from any thread performs the one-time transition
    /// (and prints the banner when enabled). Disabled systems hand back a
    /// pass-through wrapper: no sampler, no store, no blobs on disk.
    ///
    /// # Errors
    ///
    /// [`RecorderError::InvalidSampleSize`] when `sample_size` is 0;
    /// [`RecorderError::IoError`] when the recorder's store directory
    /// cannot be created.
    pub fn record<F>(&self, target: F, sample_size: usize) -> Result<Recorded<F>> {
        self.record_with_codec("fn", target, sample_size, Box::new(JsonCodec))
    }

    /// Wrap a target under a caller-supplied label
    ///
    /// The label names the recorder's subdirectory (sanitized, sequence
    /// number appended) so inspected output reads naturally.
    pub fn record_named<F>(&self, name: &str, target: F, sample_size: usize) -> Result<Recorded<F>> {
        self.record_with_codec(name, target, sample_size, Box::new(JsonCodec))
    }

    /// Wrap a target with an explicit sample codec
    pub fn record_with_codec<F>(
        &self,
        name: &str,
        target: F,
        sample_size: usize,
        codec: Box<dyn SampleCodec>,
    ) -> Result<Recorded<F>> {
        if sample_size == 0 {
            return Err(RecorderError::InvalidSampleSize(sample_size));
        }

        let (enabled, root) = self.ensure_initialized();
        if !enabled {
            return Ok(Recorded::passthrough(target));
        }

        let seq = self.recorder_seq.fetch_add(1, Ordering::Relaxed);
        let label = format!("{}_{:03}", sanitize_label(name), seq);
        let store = SampleStore::create(root.join(&label), &label, sample_size, codec)?;
        let sampler = ReservoirSampler::new(sample_size);
        debug!(label = %label, sample_size, "recorder created");
        Ok(Recorded::sampled(target, sampler, store))
    }

    /// Perform the one-time transition; returns the frozen configuration
    ///
    /// The lock is held across the whole check-set-print sequence so that
    /// under concurrent first calls exactly one thread transitions and
    /// prints, and no caller proceeds while initialization is in flight.
    fn ensure_initialized(&self) -> (bool, PathBuf) {
        let mut state = self.lock_state();
        if !state.initialized {
            state.initialized = true;
            if state.enabled {
                print_banner(&state.destination_root);
            }
        }
        (state.enabled, state.destination_root.clone())
    }

    /// Like `ensure_initialized`, reporting whether this call transitioned
    #[cfg(test)]
    fn try_transition(&self) -> bool {
        let mut state = self.lock_state();
        if state.initialized {
            false
        } else {
            state.initialized = true;
            true
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SystemState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RecordingSystem {
    fn default() -> Self {
        Self::from_env()
    }
}

impl std::fmt::Debug for RecordingSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock_state();
        f.debug_struct("RecordingSystem")
            .field("initialized", &state.initialized)
            .field("enabled", &state.enabled)
            .field("destination_root", &state.destination_root)
            .finish()
    }
}

/// Recognize the accepted truthy spellings of the enable flag
fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}

/// Keep recorder labels filesystem-safe
fn sanitize_label(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "fn".to_string()
    } else {
        cleaned
    }
}

/// One-time activation banner
fn print_banner(root: &Path) {
    println!("*********************************************");
    println!("*       Recuerdo recording is enabled       *");
    println!("*********************************************");
    println!("** Destination root: {}", root.display());
}

static GLOBAL_SYSTEM: OnceLock<RecordingSystem> = OnceLock::new();

/// The process-wide recording system, built from the environment on first
/// touch and never destroyed
pub fn global() -> &'static RecordingSystem {
    GLOBAL_SYSTEM.get_or_init(RecordingSystem::from_env)
}

/// Wrap a target with the process-wide system
pub fn record<F>(target: F, sample_size: usize) -> Result<Recorded<F>> {
    global().record(target, sample_size)
}

/// Wrap a target with the default reservoir capacity of 32
pub fn record_default<F>(target: F) -> Result<Recorded<F>> {
    global().record(target, DEFAULT_SAMPLE_SIZE)
}

/// Wrap a labeled target with the process-wide system
pub fn record_named<F>(name: &str, target: F, sample_size: usize) -> Result<Recorded<F>> {
    global().record_named(name, target, sample_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::thread;

    // Test 1: Truthy flag spellings, case-insensitive
    #[test]
    fn test_is_truthy_accepted_forms() {
        for form in ["true", "TRUE", "True", "1", "on", "ON", "yes", "YES"] {
            assert!(is_truthy(form), "{form} should enable recording");
        }
        for form in ["", "false", "0", "off", "no", "enabled", "2", "y"] {
            assert!(!is_truthy(form), "{form} should not enable recording");
        }
    }

    // Test 2: Exactly one thread performs the transition
    #[test]
    fn test_transition_happens_once_under_contention() {
        let system = Arc::new(RecordingSystem::with_config(false, "/tmp/unused"));
        let transitions = Arc::new(AtomicUsize::new(0));
        let mut handles = vec![];

        for _ in 0..16 {
            let system = Arc::clone(&system);
            let transitions = Arc::clone(&transitions);
            handles.push(thread::spawn(move || {
                if system.try_transition() {
                    transitions.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(transitions.load(Ordering::SeqCst), 1);
        assert!(system.is_initialized());
    }

    // Test 3: Configuration freezes after initialization
    #[test]
    fn test_config_frozen_after_init() {
        let tmp = tempfile::tempdir().unwrap();
        let system = RecordingSystem::with_config(true, tmp.path());

        system.set_enabled(true).unwrap();
        system.set_destination_root(tmp.path().join("moved")).unwrap();

        let _ = system.record(|x: u32| x, 4).unwrap();

        assert!(matches!(
            system.set_enabled(false),
            Err(RecorderError::FrozenConfig("enabled"))
        ));
        assert!(matches!(
            system.set_destination_root("/elsewhere"),
            Err(RecorderError::FrozenConfig("destination_root"))
        ));
    }

    // Test 4: Zero sample size is rejected before any side effect
    #[test]
    fn test_zero_sample_size_rejected() {
        let system = RecordingSystem::with_config(false, "/tmp/unused");
        let err = system.record(|x: u32| x, 0).unwrap_err();
        assert!(matches!(err, RecorderError::InvalidSampleSize(0)));
        assert!(!system.is_initialized());
    }

    // Test 5: Disabled systems hand out pass-through wrappers
    #[test]
    fn test_disabled_record_is_passthrough() {
        let tmp = tempfile::tempdir().unwrap();
        let system = RecordingSystem::with_config(false, tmp.path().join("root"));
        let wrapped = system.record(|a: i32, b: i32| a * b, 8).unwrap();

        assert!(!wrapped.is_recording());
        assert_eq!(wrapped.call((6, 7)), 42);
        assert!(!tmp.path().join("root").exists());
    }

    // Test 6: Labels are sanitized and sequence numbers keep dirs disjoint
    #[test]
    fn test_recorder_dirs_disjoint() {
        let tmp = tempfile::tempdir().unwrap();
        let system = RecordingSystem::with_config(true, tmp.path());

        let a = system.record_named("parse/request", |x: u8| x, 2).unwrap();
        let b = system.record_named("parse/request", |x: u8| x, 2).unwrap();

        let dir_a = a.store_dir().unwrap().to_path_buf();
        let dir_b = b.store_dir().unwrap().to_path_buf();
        assert_ne!(dir_a, dir_b);
        assert!(dir_a.file_name().unwrap().to_str().unwrap().starts_with("parse_request_"));
    }
}
