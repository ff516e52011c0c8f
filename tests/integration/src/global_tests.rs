//! Global Accessor Tests
//!
//! These tests exercise the process-wide manager:
//! - Identity across calls and threads
//! - Registrations visible through every reference
//! - Duplicating the global registry

mod common;

use common::*;
use ucom::{
    com_manager, get_com_manager, iid_of, ComManagerExt, ComRef, IComManager, IComManager1,
    QueryInterfaceExt, ResultCode,
};

#[test]
fn test_accessor_requires_output() {
    assert_eq!(get_com_manager(None), ResultCode::NullParam);
}

#[test]
fn test_same_instance_across_calls() {
    let mut first = None;
    let mut second = None;
    assert_eq!(get_com_manager(Some(&mut first)), ResultCode::Success);
    assert_eq!(get_com_manager(Some(&mut second)), ResultCode::Success);

    let first = first.unwrap();
    let second = second.unwrap();
    assert!(ComRef::ptr_eq(&first, &second));
}

#[test]
fn test_same_instance_across_threads() {
    let local = com_manager().unwrap();

    let seen: Vec<ComRef<dyn IComManager>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| com_manager().unwrap()))
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    for manager in &seen {
        assert!(ComRef::ptr_eq(manager, &local));
    }
}

#[test]
fn test_registration_visible_through_every_reference() {
    let writer = com_manager().unwrap();
    let reader = com_manager().unwrap();

    let result = writer.register::<dyn INamed>(factory_b);
    assert!(result.is_success());

    let named = reader.create::<dyn INamed>().unwrap();
    assert_eq!(named.name(), "B");
}

#[test]
fn test_global_can_duplicate() {
    let manager = com_manager().unwrap();
    manager.register::<dyn ICounter>(factory_a);

    let extended = manager.query::<dyn IComManager1>().unwrap();
    let mut copy = None;
    assert_eq!(extended.duplicate(Some(&mut copy)), ResultCode::Success);
    let copy = copy.unwrap();

    assert!(!ComRef::ptr_eq(&copy, &manager));
    assert!(copy.create::<dyn ICounter>().is_ok());

    copy.unregister_iid_factory(&iid_of::<dyn ICounter>());
    assert!(manager.create::<dyn ICounter>().is_ok());
}
