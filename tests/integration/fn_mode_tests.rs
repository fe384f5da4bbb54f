//! Fn-key mode integration tests

use fkey_mode::hid::{
    FnKeyError, FnKeyManager, FnMode, MemoryRegistry, UnsupportedRegistry, FN_SWITCH_ERROR,
    FN_SWITCH_OK,
};
use std::sync::Arc;
use std::thread;

fn assert_balanced(registry: &MemoryRegistry) {
    assert_eq!(registry.opens(), registry.closes());
    assert_eq!(registry.open_connections(), 0);
    assert_eq!(registry.unbalanced_closes(), 0);
}

#[test]
fn test_unsupported_platform_registry() {
    let manager = FnKeyManager::new(UnsupportedRegistry);
    assert_eq!(manager.set_fn_keys_to_apple_mode(), FN_SWITCH_ERROR);
    assert_eq!(manager.set_fn_keys_to_other_mode(), FN_SWITCH_ERROR);
    assert_eq!(manager.current_fn_key_state(), FnMode::Unknown);
}

#[cfg(not(target_os = "macos"))]
#[test]
fn test_system_entry_points_without_keyboard_service() {
    assert_eq!(fkey_mode::set_fn_keys_to_other_mode(), FN_SWITCH_ERROR);
    assert_eq!(fkey_mode::set_fn_keys_to_apple_mode(), FN_SWITCH_ERROR);
    assert_eq!(fkey_mode::current_fn_key_state(), FnMode::Unknown);
}

#[test]
fn test_each_entry_point_opens_and_closes_once() {
    let manager = FnKeyManager::new(MemoryRegistry::with_mode(FnMode::Other));

    assert_eq!(manager.set_fn_keys_to_apple_mode(), FN_SWITCH_OK);
    assert_eq!(manager.registry().opens(), 1);
    assert_eq!(manager.registry().closes(), 1);

    assert_eq!(manager.current_fn_key_state(), FnMode::Apple);
    assert_eq!(manager.registry().opens(), 2);
    assert_eq!(manager.registry().closes(), 2);

    assert_eq!(manager.set_fn_keys_to_other_mode(), FN_SWITCH_OK);
    assert_eq!(manager.registry().opens(), 3);
    assert_eq!(manager.registry().closes(), 3);

    assert_eq!(manager.current_fn_key_state(), FnMode::Other);
    assert_balanced(manager.registry());
}

#[test]
fn test_missing_property_releases_handle() {
    let manager = FnKeyManager::new(MemoryRegistry::new());
    assert!(matches!(
        manager.read_mode(),
        Err(FnKeyError::PropertyError { .. })
    ));
    assert_eq!(manager.current_fn_key_state(), FnMode::Unknown);
    assert_eq!(manager.registry().opens(), 2);
    assert_balanced(manager.registry());
}

#[test]
fn test_set_then_get_after_recovery() {
    let manager = FnKeyManager::new(MemoryRegistry::with_mode(FnMode::Apple));

    manager.registry().fail_open_with(Some(-1));
    assert_eq!(manager.set_fn_keys_to_other_mode(), u32::MAX);
    assert_eq!(manager.registry().raw(), Some(0));

    manager.registry().fail_open_with(None);
    assert_eq!(manager.set_fn_keys_to_other_mode(), FN_SWITCH_OK);
    assert_eq!(manager.current_fn_key_state(), FnMode::Other);
    assert_balanced(manager.registry());
}

#[test]
fn test_concurrent_callers_stay_balanced() {
    let manager = Arc::new(FnKeyManager::new(MemoryRegistry::with_mode(FnMode::Other)));

    let workers: Vec<_> = (0..8)
        .map(|i| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                for _ in 0..25 {
                    let status = if i % 2 == 0 {
                        manager.set_fn_keys_to_apple_mode()
                    } else {
                        manager.set_fn_keys_to_other_mode()
                    };
                    assert_eq!(status, FN_SWITCH_OK);
                    assert!(manager.current_fn_key_state().is_known());
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(manager.registry().opens(), 8 * 25 * 2);
    assert_balanced(manager.registry());
}
