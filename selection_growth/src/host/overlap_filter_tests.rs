use slotmap::SlotMap;
use super::*;

fn keys(count: usize) -> Vec<InstanceKey> {
    let mut map: SlotMap<InstanceKey, ()> = SlotMap::with_key();
    (0..count).map(|_| map.insert(())).collect()
}

// ============================================================================
// accepts()
// ============================================================================

#[test]
fn test_new_reports_leaves_without_predicate() {
    let ignore = FxHashSet::default();
    let filter = OverlapFilter::new(InstanceMask::MESH, &ignore);
    assert_eq!(filter.grouping, Grouping::Leaves);
    assert!(filter.predicate.is_none());
}

#[test]
fn test_accepts_checks_mask() {
    let k = keys(1);
    let ignore = FxHashSet::default();
    let filter = OverlapFilter::new(InstanceMask::GROWABLE, &ignore);

    assert!(filter.accepts(k[0], InstanceKind::Mesh));
    assert!(filter.accepts(k[0], InstanceKind::Sprite));
    assert!(!filter.accepts(k[0], InstanceKind::Terrain));
    assert!(!filter.accepts(k[0], InstanceKind::Other));
}

#[test]
fn test_accepts_checks_ignore_set() {
    let k = keys(2);
    let ignore: FxHashSet<InstanceKey> = [k[0]].into_iter().collect();
    let filter = OverlapFilter::new(InstanceMask::all(), &ignore);

    assert!(!filter.accepts(k[0], InstanceKind::Mesh));
    assert!(filter.accepts(k[1], InstanceKind::Mesh));
}

#[test]
fn test_accepts_checks_predicate() {
    let k = keys(2);
    let ignore = FxHashSet::default();
    let only_second = |key: InstanceKey| key == k[1];
    let filter = OverlapFilter::new(InstanceMask::all(), &ignore).with_predicate(&only_second);

    assert!(!filter.accepts(k[0], InstanceKind::Mesh));
    assert!(filter.accepts(k[1], InstanceKind::Mesh));
}

#[test]
fn test_debug_summarizes_fields() {
    let k = keys(3);
    let ignore: FxHashSet<InstanceKey> = k.iter().copied().collect();
    let filter = OverlapFilter::new(InstanceMask::MESH, &ignore).with_grouping(Grouping::GroupingRoots);

    let text = format!("{:?}", filter);
    assert!(text.contains("ignore: 3"));
    assert!(text.contains("GroupingRoots"));
    assert!(text.contains("predicate: false"));
}
