//! Concurrency Tests
//!
//! These tests exercise the object model from many threads at once:
//! - Racing acquires and releases destroy exactly once
//! - Concurrent registration and creation on one manager
//! - Factories calling back into the manager that runs them

mod common;

use std::sync::Barrier;

use parking_lot::Mutex;

use common::*;
use ucom::{
    com_manager, ComManager, ComManagerExt, ComRef, ConstructionInfo, IComManager,
    IUnknown, InterfaceSlot, QueryInterfaceExt, ResultCode, Uuid,
};

const THREADS: usize = 8;
const ITERATIONS: usize = 1_000;

#[test]
fn test_concurrent_clone_and_drop() {
    let log = DropLog::new();
    let object = tracked("shared", &log);

    std::thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                for _ in 0..ITERATIONS {
                    let copy = object.clone();
                    assert!(copy.ref_count() >= 2);
                }
            });
        }
    });

    assert_eq!(object.ref_count(), 1);
    assert!(log.is_empty());
    drop(object);
    assert_eq!(log.count("shared"), 1);
}

#[test]
fn test_concurrent_add_release_net_zero() {
    let log = DropLog::new();
    let object = tracked("balanced", &log);

    std::thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                for _ in 0..ITERATIONS {
                    object.add_reference();
                }
                for _ in 0..ITERATIONS {
                    unsafe {
                        object.release_reference();
                    }
                }
            });
        }
    });

    assert_eq!(object.ref_count(), 1);
    assert!(log.is_empty());
}

#[test]
fn test_racing_final_releases_destroy_once() {
    for round in 0..50 {
        let log = DropLog::new();
        let name = format!("race-{round}");
        let object = tracked(&name, &log);
        let copies: Vec<_> = (0..THREADS).map(|_| object.query::<dyn ICounter>().unwrap()).collect();
        drop(object);

        let barrier = Barrier::new(THREADS);
        std::thread::scope(|scope| {
            for copy in copies {
                let barrier = &barrier;
                scope.spawn(move || {
                    copy.bump();
                    barrier.wait();
                    drop(copy);
                });
            }
        });

        assert_eq!(log.count(&name), 1);
    }
}

#[test]
fn test_concurrent_registration_distinct_identifiers() {
    let manager = ComManager::new();

    std::thread::scope(|scope| {
        for thread in 0..THREADS {
            let manager = &manager;
            scope.spawn(move || {
                for index in 0..100 {
                    let iid = Uuid::new(thread as u64, index);
                    assert_eq!(
                        manager.register_iid_factory(&iid, Some(factory_a)),
                        ResultCode::Success
                    );
                }
            });
        }
    });

    assert_eq!(manager.len(), THREADS * 100);
}

#[test]
fn test_concurrent_registration_same_identifier() {
    let manager = ComManager::new();
    let results = Mutex::new(Vec::new());
    let barrier = Barrier::new(THREADS);

    std::thread::scope(|scope| {
        for thread in 0..THREADS {
            let (manager, results, barrier) = (&manager, &results, &barrier);
            scope.spawn(move || {
                let factory = if thread % 2 == 0 { factory_a } else { factory_b };
                barrier.wait();
                let result = manager.register::<dyn INamed>(factory);
                results.lock().push(result);
            });
        }
    });

    let results = results.into_inner();
    let fresh = results.iter().filter(|result| **result == ResultCode::Success).count();
    let overwritten = results
        .iter()
        .filter(|result| **result == ResultCode::FactoryAlreadyRegistered)
        .count();
    assert_eq!(fresh, 1);
    assert_eq!(overwritten, THREADS - 1);

    let name = manager.create::<dyn INamed>().unwrap().name();
    assert!(name == "A" || name == "B");
}

#[test]
fn test_create_while_registering() {
    let manager = ComRef::new(ComManager::new());
    manager.register::<dyn ICounter>(factory_a);

    std::thread::scope(|scope| {
        for _ in 0..THREADS / 2 {
            scope.spawn(|| {
                for _ in 0..ITERATIONS {
                    assert!(manager.create::<dyn ICounter>().is_ok());
                }
            });
        }
        for thread in 0..THREADS / 2 {
            let manager = &manager;
            scope.spawn(move || {
                for index in 0..ITERATIONS {
                    let factory = if (thread + index) % 2 == 0 { factory_a } else { factory_b };
                    assert!(manager.register::<dyn ICounter>(factory).is_success());
                }
            });
        }
    });

    assert_eq!(manager.len(), 1);
}

fn reentrant_factory(
    iid: &Uuid,
    slot: Option<&mut InterfaceSlot>,
    info: Option<&ConstructionInfo<'_>>,
) -> ResultCode {
    let manager = match com_manager() {
        Ok(manager) => manager,
        Err(err) => return err.code(),
    };
    // Re-registers while the same manager is creating through this factory
    let result = manager.register::<dyn ICounter>(factory_b);
    if result.is_failure() {
        return result;
    }
    factory_a(iid, slot, info)
}

#[test]
fn test_factory_reenters_manager() {
    let manager = com_manager().unwrap();
    manager.register::<dyn ICounter>(reentrant_factory);

    let first = manager.create::<dyn ICounter>().unwrap();
    assert_eq!(first.query::<dyn INamed>().unwrap().name(), "A");

    let second = manager.create::<dyn ICounter>().unwrap();
    assert_eq!(second.query::<dyn INamed>().unwrap().name(), "B");
}

#[test]
fn test_concurrent_global_creation() {
    let seen = Mutex::new(Vec::new());

    std::thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                let manager = com_manager().unwrap();
                let created = manager.create::<dyn IComManager>().unwrap();
                assert!(!ComRef::ptr_eq(&created, &manager));
                seen.lock().push(manager);
            });
        }
    });

    let seen = seen.into_inner();
    assert!(seen.windows(2).all(|pair| ComRef::ptr_eq(&pair[0], &pair[1])));
    assert!(seen[0].query::<dyn IUnknown>().is_ok());
}
