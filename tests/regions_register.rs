use std::collections::{BTreeMap, BTreeSet};

use regions_register::debug_utils::{DisplayRegister, validate_register};
use regions_register::{Area, AreaId, Options, RegionsRegister, RegisterError};

fn id(index: usize) -> AreaId {
    AreaId::new(index)
}

fn area<const N: usize>(labels: [&str; N]) -> Area {
    Area::from(labels)
}

fn register() -> RegionsRegister {
    RegionsRegister::with_options(Options {
        threaded: false,
        verify_invariants: true,
    })
}

/// {abc}, {abc, def}, {def, ghi}, {jkl, mno, pqr}
fn standalone_first() -> RegionsRegister {
    let mut reg = register();
    assert_eq!(reg.add_area(["abc"]), Ok(id(0)));
    assert_eq!(reg.add_area(["abc", "def"]), Ok(id(1)));
    assert_eq!(reg.add_area(["def", "ghi"]), Ok(id(2)));
    assert_eq!(reg.add_area(["jkl", "mno", "pqr"]), Ok(id(3)));
    reg
}

/// {abc, def}, {abc}, {def, ghi}, {jkl, mno, pqr}
fn pair_first() -> RegionsRegister {
    let mut reg = register();
    assert_eq!(reg.add_area(["abc", "def"]), Ok(id(0)));
    assert_eq!(reg.add_area(["abc"]), Ok(id(1)));
    assert_eq!(reg.add_area(["def", "ghi"]), Ok(id(2)));
    assert_eq!(reg.add_area(["jkl", "mno", "pqr"]), Ok(id(3)));
    reg
}

#[test]
fn add_elements() {
    let reg = pair_first();
    assert_eq!(reg.regions_number(), 4);
    assert_eq!(reg.id(), Some(3));
}

#[test]
fn empty_register() {
    let reg = RegionsRegister::new();
    assert_eq!(reg.regions_number(), 0);
    assert_eq!(reg.id(), None);
    assert!(reg.instances().is_empty());
    assert!(reg.entries().is_empty());
    assert_eq!(reg.find_regions(&area(["abc"])), None);
    assert_eq!(reg.find_regions_by_id(id(0)), None);
}

#[test]
fn remove_elements() {
    let mut reg = standalone_first();
    let remap = reg.remove_region("def");

    assert_eq!(reg.regions_number(), 3);
    assert_eq!(remap.len(), 1);
    assert_eq!(remap.iter().next(), Some((id(1), id(0))));
    assert_eq!(remap.resolve(id(1)), id(0));
    assert_eq!(remap.resolve(id(2)), id(2));
}

#[test]
fn find_elements() {
    let mut reg = pair_first();
    assert_eq!(reg.find_regions(&area(["abc", "def"])), Some(id(0)));

    let remap = reg.remove_region("def");
    assert_eq!(remap.into_map(), BTreeMap::from([(id(0), id(1))]));

    assert_eq!(reg.find_regions(&area(["abc", "def"])), None);
    assert_eq!(reg.find_regions(&area(["abc"])), Some(id(1)));

    // The retired identifier is the smallest free one.
    assert_eq!(reg.add_area(["mno"]), Ok(id(0)));
    assert_eq!(reg.find_regions(&area(["mno"])), Some(id(0)));
}

#[test]
fn find_regions_by_id() {
    let mut reg = standalone_first();
    assert_eq!(reg.find_regions_by_id(id(0)), Some(&area(["abc"])));
    assert_eq!(reg.find_regions_by_id(id(1)), Some(&area(["abc", "def"])));
    assert_eq!(reg.find_regions_by_id(id(2)), Some(&area(["def", "ghi"])));
    assert_eq!(
        reg.find_regions_by_id(id(3)),
        Some(&area(["jkl", "mno", "pqr"]))
    );

    reg.remove_region("def");

    assert_eq!(reg.find_regions_by_id(id(0)), Some(&area(["abc"])));
    assert_eq!(reg.find_regions_by_id(id(1)), None);
    assert_eq!(reg.find_regions_by_id(id(2)), Some(&area(["ghi"])));
    assert_eq!(
        reg.find_regions_by_id(id(3)),
        Some(&area(["jkl", "mno", "pqr"]))
    );
}

#[test]
fn label_order_does_not_matter() {
    let mut reg = register();
    let first = reg.add_area(["b", "a"]).unwrap();
    assert_eq!(reg.find_regions(&area(["a", "b"])), Some(first));
    assert_eq!(
        reg.add_area(["a", "b", "a"]),
        Err(RegisterError::AreaExists(first))
    );
}

#[test]
fn rejected_areas_leave_state_untouched() {
    let mut reg = standalone_first();
    let before = reg.areas();

    assert_eq!(
        reg.add_area(Area::default()),
        Err(RegisterError::EmptyArea)
    );
    assert_eq!(
        reg.add_area(["def", "ghi"]),
        Err(RegisterError::AreaExists(id(2)))
    );

    assert_eq!(reg.areas(), before);
    assert_eq!(reg.id(), Some(3));
}

#[test]
fn removing_unknown_label_is_a_no_op() {
    let mut reg = standalone_first();
    let before = reg.areas();

    let remap = reg.remove_region("xyz");

    assert!(remap.is_empty());
    assert_eq!(reg.areas(), before);
    assert_eq!(reg.id(), Some(3));
}

#[test]
fn standalone_area_is_deleted() {
    let mut reg = register();
    reg.add_area(["abc"]).unwrap();
    reg.add_area(["def"]).unwrap();

    let remap = reg.remove_region("abc");

    assert!(remap.is_empty());
    assert_eq!(reg.regions_number(), 1);
    assert_eq!(reg.find_regions_by_id(id(0)), None);
    assert_eq!(reg.find_regions(&area(["def"])), Some(id(1)));
    assert_eq!(reg.add_area(["ghi"]), Ok(id(0)));
}

#[test]
fn residual_keeps_identifier() {
    let mut reg = register();
    reg.add_area(["x"]).unwrap();
    reg.add_area(["a", "b", "c"]).unwrap();

    let remap = reg.remove_region("b");

    assert!(remap.is_empty());
    assert_eq!(reg.find_regions(&area(["a", "c"])), Some(id(1)));
    assert_eq!(reg.find_regions_by_id(id(1)), Some(&area(["a", "c"])));
    assert_eq!(reg.find_regions(&area(["a", "b", "c"])), None);
}

#[test]
fn several_areas_split_and_merge_at_once() {
    let mut reg = register();
    reg.add_area(["a"]).unwrap(); // 0
    reg.add_area(["a", "x"]).unwrap(); // 1
    reg.add_area(["b", "x"]).unwrap(); // 2
    reg.add_area(["b"]).unwrap(); // 3
    reg.add_area(["c", "d", "x"]).unwrap(); // 4
    reg.add_area(["x"]).unwrap(); // 5

    let remap = reg.remove_region("x");

    assert_eq!(
        remap.into_map(),
        BTreeMap::from([(id(1), id(0)), (id(2), id(3))])
    );
    assert_eq!(
        reg.areas(),
        BTreeMap::from([
            (area(["a"]), id(0)),
            (area(["b"]), id(3)),
            (area(["c", "d"]), id(4)),
        ])
    );
    validate_register(&reg).unwrap();

    // Freed identifiers are handed out smallest first.
    assert_eq!(reg.add_area(["e"]), Ok(id(1)));
    assert_eq!(reg.add_area(["f"]), Ok(id(2)));
    assert_eq!(reg.add_area(["g"]), Ok(id(5)));
    assert_eq!(reg.add_area(["h"]), Ok(id(6)));
}

#[test]
fn lookups_are_inverse() {
    let mut reg = pair_first();
    reg.remove_region("ghi");
    reg.add_area(["ghi", "mno"]).unwrap();
    for (area, id) in reg.areas() {
        assert_eq!(reg.find_regions_by_id(id), Some(&area));
        assert_eq!(reg.find_regions(&area), Some(id));
    }
}

#[test]
fn clear_keeps_entity_types() {
    let mut reg = standalone_first();
    reg.add_entity_type("abc", "table");

    reg.clear();

    assert_eq!(reg.regions_number(), 0);
    assert_eq!(reg.id(), None);
    assert_eq!(reg.find_regions_by_id(id(0)), None);
    assert_eq!(reg.entity_type("abc"), Some("table"));
    assert_eq!(reg.add_area(["def"]), Ok(id(0)));
    assert_eq!(reg.id(), Some(0));
}

#[test]
fn counter_is_not_adjusted_by_removals() {
    let mut reg = standalone_first();
    reg.remove_region("abc");
    reg.remove_region("jkl");
    assert_eq!(reg.id(), Some(3));
    assert_eq!(reg.regions_number(), 3);
}

#[test]
fn instances_and_entries() {
    let reg = pair_first();
    assert_eq!(
        reg.instances(),
        vec!["abc", "def", "ghi", "jkl", "mno", "pqr"]
    );
    assert_eq!(
        reg.entries(),
        vec![
            area(["abc"]),
            area(["abc", "def"]),
            area(["def", "ghi"]),
            area(["jkl", "mno", "pqr"]),
        ]
    );
}

#[test]
fn entity_ids() {
    let reg = pair_first();
    assert_eq!(reg.entity_ids("abc"), vec![id(1), id(0)]);
    assert_eq!(reg.entity_ids("def"), vec![id(0), id(2)]);
    assert_eq!(reg.entity_ids("mno"), vec![id(3)]);
    assert!(reg.entity_ids("xyz").is_empty());
}

#[test]
fn coexistent_entities() {
    let reg = pair_first();
    assert_eq!(
        reg.coexistent_entities("def"),
        BTreeSet::from(["abc".to_string(), "ghi".to_string()])
    );
    assert_eq!(
        reg.coexistent_entities("mno"),
        BTreeSet::from(["jkl".to_string(), "pqr".to_string()])
    );
    assert!(reg.coexistent_entities("xyz").is_empty());
}

#[test]
fn entity_types_last_write_wins() {
    let mut reg = RegionsRegister::new();
    assert_eq!(reg.entity_type("door_1"), None);
    reg.add_entity_type("door_1", "door");
    reg.add_entity_type("door_1", "portal");
    assert_eq!(reg.entity_type("door_1"), Some("portal"));
}

#[test]
fn display() {
    let reg = standalone_first();
    assert_eq!(
        DisplayRegister(&reg).to_string(),
        "Area 0: abc\nArea 1: abc def\nArea 2: def ghi\nArea 3: jkl mno pqr\n"
    );
    assert_eq!(reg.to_string(), DisplayRegister(&reg).to_string());
}

#[test]
fn stats_are_collected() {
    let mut reg = standalone_first();
    reg.remove_region("def");
    let stats = reg.stats().to_string();
    assert!(stats.contains("areas_added: 4"), "{stats}");
    assert!(stats.contains("areas_merged: 1"), "{stats}");
    assert!(stats.contains("residuals_installed: 1"), "{stats}");
}
