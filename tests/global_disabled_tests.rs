//! Process-global entry point with recording disabled
//!
//! Runs in its own test binary (own process) because the global system
//! initializes exactly once per process. No enable flag is set here, so
//! every free-function wrapper must be a pass-through.

use serial_test::serial;

#[test]
#[serial]
fn test_global_disabled_by_default() {
    std::env::remove_var(recuerdo::system::ENABLED_ENV);

    let wrapped = recuerdo::record(|a: u32, b: u32| a.wrapping_mul(b), 8).unwrap();
    assert!(!wrapped.is_recording());
    for i in 0..50 {
        assert_eq!(wrapped.call((i, 3)), i.wrapping_mul(3));
    }

    let system = recuerdo::system::global();
    assert!(system.is_initialized());
    assert!(!system.is_enabled());
    assert!(!system.destination_root().exists());
}

#[test]
#[serial]
fn test_global_default_sample_size_wrapper() {
    std::env::remove_var(recuerdo::system::ENABLED_ENV);

    let wrapped = recuerdo::record_default(|s: String| s.to_uppercase()).unwrap();
    assert_eq!(wrapped.call(("abc".to_string(),)), "ABC");
    assert!(!wrapped.is_recording());
}

#[test]
#[serial]
fn test_global_named_wrapper_disabled() {
    std::env::remove_var(recuerdo::system::ENABLED_ENV);

    let wrapped = recuerdo::record_named("noop", || 7u8, 4).unwrap();
    assert_eq!(wrapped.call(()), 7);
    assert_eq!(wrapped.stats(), recuerdo::recorder::RecorderStats::default());
}
