#![cfg(feature = "sync")]

use std::sync::Arc;
use std::thread;

use regions_register::debug_utils::validate_register;
use regions_register::{Area, AreaId, RegionsRegister, SharedRegionsRegister};

#[test]
fn threaded_flag_is_recorded() {
    assert!(SharedRegionsRegister::new(true).is_threaded());
    assert!(!SharedRegionsRegister::new(false).is_threaded());
}

#[test]
fn mirrors_register_operations() {
    let shared = SharedRegionsRegister::new(false);
    assert_eq!(shared.add_area(["abc"]), Ok(AreaId::new(0)));
    assert_eq!(shared.add_area(["abc", "def"]), Ok(AreaId::new(1)));
    assert_eq!(shared.add_area(["def", "ghi"]), Ok(AreaId::new(2)));

    let remap = shared.remove_region("def");
    assert_eq!(remap.get(AreaId::new(1)), Some(AreaId::new(0)));
    assert_eq!(shared.regions_number(), 2);
    assert_eq!(shared.id(), Some(2));
    assert_eq!(
        shared.find_regions_by_id(AreaId::new(2)),
        Some(Area::from(["ghi"]))
    );
    assert_eq!(shared.find_regions(&Area::from(["abc"])), Some(AreaId::new(0)));
    assert_eq!(shared.instances(), vec!["abc", "ghi"]);

    shared.add_entity_type("abc", "room");
    shared.clear();
    assert_eq!(shared.regions_number(), 0);
    assert_eq!(shared.entity_type("abc").as_deref(), Some("room"));
}

#[test]
fn atomically_is_reentrant() {
    let shared = SharedRegionsRegister::new(true);
    let (a, b) = shared.atomically(|shared| {
        let a = shared.add_area(["a"]).unwrap();
        let b = shared.add_area(["a", "b"]).unwrap();
        // Nested critical sections on the same thread don't deadlock.
        shared.atomically(|shared| assert_eq!(shared.regions_number(), 2));
        (a, b)
    });
    assert_eq!((a, b), (AreaId::new(0), AreaId::new(1)));
}

#[test]
fn concurrent_adds_get_distinct_ids() {
    let shared = Arc::new(SharedRegionsRegister::new(true));
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                (0..50)
                    .map(|i| shared.add_area([format!("t{t}"), format!("i{i}")]).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids: Vec<usize> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .map(AreaId::index)
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, (0..200).collect::<Vec<_>>());
    assert_eq!(shared.id(), Some(199));
    shared.with(|register| validate_register(register).unwrap());
}

#[test]
fn concurrent_removals_keep_register_consistent() {
    let shared = Arc::new(SharedRegionsRegister::new(true));
    for i in 0..20 {
        shared.add_area([format!("r{i}")]).unwrap();
        shared.add_area([format!("r{i}"), format!("r{}", i + 1)]).unwrap();
    }

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for i in (t..20).step_by(4) {
                    shared.remove_region(&format!("r{i}"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    shared.with(|register| validate_register(register).unwrap());
    assert!(
        shared
            .instances()
            .iter()
            .all(|label| label == "r20"),
        "{shared}"
    );
}

#[test]
fn round_trips_through_plain_register() {
    let mut register = RegionsRegister::new();
    register.add_area(["x"]).unwrap();
    let shared = SharedRegionsRegister::from(register);
    shared.add_area(["y"]).unwrap();
    let register = shared.into_inner();
    assert_eq!(register.regions_number(), 2);
}
