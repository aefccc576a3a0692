use glam::Vec3;
use slotmap::SlotMap;
use crate::scene::{Scene, SceneInstanceDesc};
use super::*;

fn keys(count: usize) -> Vec<InstanceKey> {
    let mut map: SlotMap<InstanceKey, ()> = SlotMap::with_key();
    (0..count).map(|_| map.insert(())).collect()
}

// ============================================================================
// Membership
// ============================================================================

#[test]
fn test_new_is_empty() {
    let set = SelectionSet::new();
    assert!(set.is_empty());
    assert_eq!(set.len(), 0);
}

#[test]
fn test_insert_rejects_duplicates() {
    let k = keys(2);
    let mut set = SelectionSet::new();
    assert!(set.insert(k[0]));
    assert!(set.insert(k[1]));
    assert!(!set.insert(k[0]));
    assert_eq!(set.len(), 2);
    assert!(set.contains(k[0]));
}

#[test]
fn test_insertion_order_preserved() {
    let k = keys(4);
    let set: SelectionSet = [k[2], k[0], k[3], k[0], k[1]].into_iter().collect();
    assert_eq!(set.as_slice(), &[k[2], k[0], k[3], k[1]]);
}

#[test]
fn test_remove_keeps_order_of_others() {
    let k = keys(3);
    let mut set: SelectionSet = k.iter().copied().collect();
    assert!(set.remove(k[1]));
    assert!(!set.remove(k[1]));
    assert_eq!(set.as_slice(), &[k[0], k[2]]);
    assert!(!set.contains(k[1]));
}

#[test]
fn test_clear() {
    let k = keys(3);
    let mut set: SelectionSet = k.iter().copied().collect();
    set.clear();
    assert!(set.is_empty());
    assert!(!set.contains(k[0]));
}

// ============================================================================
// Comparison
// ============================================================================

#[test]
fn test_eq_is_order_sensitive() {
    let k = keys(2);
    let a: SelectionSet = [k[0], k[1]].into_iter().collect();
    let b: SelectionSet = [k[1], k[0]].into_iter().collect();
    assert_ne!(a, b);
    assert!(a.same_members(&b));
}

#[test]
fn test_is_superset() {
    let k = keys(3);
    let all: SelectionSet = k.iter().copied().collect();
    let some: SelectionSet = [k[2]].into_iter().collect();
    assert!(all.is_superset(&some));
    assert!(!some.is_superset(&all));
    assert!(all.is_superset(&SelectionSet::new()));
}

#[test]
fn test_iterators_agree() {
    let k = keys(3);
    let set: SelectionSet = k.iter().copied().collect();
    let by_iter: Vec<_> = set.iter().collect();
    let by_ref: Vec<_> = (&set).into_iter().collect();
    assert_eq!(by_iter, k);
    assert_eq!(by_ref, k);
}

// ============================================================================
// Grouping roots
// ============================================================================

#[test]
fn test_grouping_roots_collapses_siblings() {
    let mut scene = Scene::new();
    let group = scene.create_instance(SceneInstanceDesc::mesh("group", Vec3::ZERO).as_grouping_root());
    let a = scene.create_child_instance(group, SceneInstanceDesc::mesh("a", Vec3::X)).unwrap();
    let b = scene.create_child_instance(group, SceneInstanceDesc::mesh("b", Vec3::Y)).unwrap();
    let loose = scene.create_instance(SceneInstanceDesc::mesh("loose", Vec3::Z * 5.0));

    let set: SelectionSet = [loose, a, b].into_iter().collect();
    let roots = set.grouping_roots(&scene);

    assert_eq!(roots.as_slice(), &[loose, group]);
}

#[test]
fn test_grouping_roots_drops_unknown_keys() {
    let mut scene = Scene::new();
    let live = scene.create_instance(SceneInstanceDesc::mesh("live", Vec3::ZERO));
    let dead = scene.create_instance(SceneInstanceDesc::mesh("dead", Vec3::X));
    scene.remove_instance(dead);

    let set: SelectionSet = [dead, live].into_iter().collect();
    assert_eq!(set.grouping_roots(&scene).as_slice(), &[live]);
}
