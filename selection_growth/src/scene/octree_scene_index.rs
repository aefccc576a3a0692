/// OctreeSceneIndex — static octree broad phase for overlap queries.
///
/// Single-node placement: each instance is stored in exactly one node, the
/// deepest node whose AABB fully contains the instance. Instances that
/// straddle a child boundary stay in the parent; instances outside the
/// octree bounds are stored at the root. Queries therefore never report
/// duplicates.
///
/// The tree is pre-allocated at construction time with a fixed `max_depth`.
/// All 8^d nodes exist regardless of occupancy.

use rustc_hash::FxHashMap;
use glam::Vec3;
use crate::geometry::AABB;
use super::instance::InstanceKey;
use super::scene_index::SceneIndex;

/// Index of the root node in the flat node array.
const ROOT: usize = 0;

/// How a node or object box relates to the query region.
///
/// - `Outside` → skip the entire subtree
/// - `Inside` → collect all objects without further testing
/// - `Partial` → test individual objects and recurse into children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Containment {
    Outside,
    Inside,
    Partial,
}

fn classify(region: &AABB, aabb: &AABB) -> Containment {
    if !region.intersects(aabb) {
        Containment::Outside
    } else if region.contains(aabb) {
        Containment::Inside
    } else {
        Containment::Partial
    }
}

/// A single node in the octree.
#[derive(Debug)]
struct OctreeNode {
    /// World-space AABB of this node
    aabb: AABB,
    /// Index of the first child in the flat array (0 = no children / leaf)
    first_child: usize,
    /// Instances stored in this node
    objects: Vec<InstanceKey>,
}

/// Static octree spatial index.
#[derive(Debug)]
pub struct OctreeSceneIndex {
    /// Flat array of all octree nodes, depth-first
    nodes: Vec<OctreeNode>,
    /// Maximum depth of the tree (root = depth 0)
    max_depth: u32,
    /// Reverse lookup: instance key → (node index, world AABB)
    object_locations: FxHashMap<InstanceKey, (usize, AABB)>,
    /// subtree_sizes[d] = total node count for a subtree of depth d
    subtree_sizes: Vec<usize>,
}

impl OctreeSceneIndex {
    /// Create a new static octree with the given world bounds and depth.
    ///
    /// # Arguments
    ///
    /// * `world_aabb` - The world-space AABB encompassing the level
    /// * `max_depth` - Maximum tree depth (root = 0). Total nodes = (8^(d+1) - 1) / 7.
    ///   Typical values: 4–6.
    pub fn new(world_aabb: AABB, max_depth: u32) -> Self {
        let total_nodes = Self::total_node_count(max_depth);
        let mut nodes = Vec::with_capacity(total_nodes);

        Self::build_recursive(&mut nodes, &world_aabb, 0, max_depth);
        debug_assert_eq!(nodes.len(), total_nodes);

        Self {
            nodes,
            max_depth,
            object_locations: FxHashMap::default(),
            subtree_sizes: (0..=max_depth).map(Self::total_node_count).collect(),
        }
    }

    /// Total number of nodes for a given depth: (8^(d+1) - 1) / 7
    fn total_node_count(max_depth: u32) -> usize {
        (0..=max_depth).map(|level| 8usize.pow(level)).sum()
    }

    fn build_recursive(nodes: &mut Vec<OctreeNode>, aabb: &AABB, depth: u32, max_depth: u32) {
        let node_index = nodes.len();
        nodes.push(OctreeNode {
            aabb: *aabb,
            first_child: 0,
            objects: Vec::new(),
        });

        if depth >= max_depth {
            return;
        }

        let center = aabb.center();
        nodes[node_index].first_child = nodes.len();
        for octant in 0..8u8 {
            let child_aabb = Self::octant_aabb(aabb, center, octant);
            Self::build_recursive(nodes, &child_aabb, depth + 1, max_depth);
        }
    }

    /// AABB of octant 0–7. Bit layout: bit0 = X, bit1 = Y, bit2 = Z (0 = low, 1 = high).
    fn octant_aabb(parent: &AABB, center: Vec3, octant: u8) -> AABB {
        let high = |bit: u8| octant & bit != 0;
        AABB {
            min: Vec3::new(
                if high(1) { center.x } else { parent.min.x },
                if high(2) { center.y } else { parent.min.y },
                if high(4) { center.z } else { parent.min.z },
            ),
            max: Vec3::new(
                if high(1) { parent.max.x } else { center.x },
                if high(2) { parent.max.y } else { center.y },
                if high(4) { parent.max.z } else { center.z },
            ),
        }
    }

    fn point_octant(center: Vec3, point: Vec3) -> u8 {
        (point.x >= center.x) as u8
            | (((point.y >= center.y) as u8) << 1)
            | (((point.z >= center.z) as u8) << 2)
    }

    /// Deepest node that fully contains `world_aabb`.
    ///
    /// Descends while both AABB corners fall into the same octant.
    fn find_target_node(&self, world_aabb: &AABB) -> usize {
        if !self.nodes[ROOT].aabb.contains(world_aabb) {
            return ROOT;
        }

        let mut node_idx = ROOT;
        let mut depth = 0;
        loop {
            let first_child = self.nodes[node_idx].first_child;
            if depth >= self.max_depth || first_child == 0 {
                return node_idx;
            }

            let center = self.nodes[node_idx].aabb.center();
            let min_oct = Self::point_octant(center, world_aabb.min);
            let max_oct = Self::point_octant(center, world_aabb.max);
            if min_oct != max_oct {
                return node_idx;
            }

            node_idx = first_child + self.subtree_offset(min_oct, self.max_depth - depth - 1);
            depth += 1;
        }
    }

    /// Offset of octant `i` in the depth-first node layout.
    fn subtree_offset(&self, octant: u8, remaining_depth: u32) -> usize {
        octant as usize * self.subtree_sizes[remaining_depth as usize]
    }

    fn child_indices(&self, node_idx: usize, depth: u32) -> impl Iterator<Item = usize> + '_ {
        let first_child = self.nodes[node_idx].first_child;
        let has_children = depth < self.max_depth && first_child != 0;
        let octants = if has_children { 0..8u8 } else { 0..0 };
        octants.map(move |octant| {
            first_child + self.subtree_offset(octant, self.max_depth - depth - 1)
        })
    }

    fn query_node(&self, node_idx: usize, depth: u32, region: &AABB, results: &mut Vec<InstanceKey>) {
        match classify(region, &self.nodes[node_idx].aabb) {
            Containment::Outside => {}
            Containment::Inside => self.collect_all(node_idx, depth, results),
            Containment::Partial => {
                self.test_objects(node_idx, region, results);
                for child in self.child_indices(node_idx, depth) {
                    self.query_node(child, depth + 1, region, results);
                }
            }
        }
    }

    fn test_objects(&self, node_idx: usize, region: &AABB, results: &mut Vec<InstanceKey>) {
        for &key in &self.nodes[node_idx].objects {
            if let Some((_, world_aabb)) = self.object_locations.get(&key) {
                if region.intersects(world_aabb) {
                    results.push(key);
                }
            }
        }
    }

    /// Collect all objects from a node and its entire subtree (no test).
    fn collect_all(&self, node_idx: usize, depth: u32, results: &mut Vec<InstanceKey>) {
        results.extend_from_slice(&self.nodes[node_idx].objects);
        for child in self.child_indices(node_idx, depth) {
            self.collect_all(child, depth + 1, results);
        }
    }
}

// ===== SCENE INDEX TRAIT =====

impl SceneIndex for OctreeSceneIndex {
    fn insert(&mut self, key: InstanceKey, world_aabb: &AABB) {
        if self.object_locations.contains_key(&key) {
            self.update(key, world_aabb);
            return;
        }
        let node_idx = self.find_target_node(world_aabb);
        self.nodes[node_idx].objects.push(key);
        self.object_locations.insert(key, (node_idx, *world_aabb));
    }

    fn remove(&mut self, key: InstanceKey) {
        if let Some((node_idx, _)) = self.object_locations.remove(&key) {
            let objects = &mut self.nodes[node_idx].objects;
            if let Some(pos) = objects.iter().position(|&k| k == key) {
                objects.swap_remove(pos);
            }
        }
    }

    fn update(&mut self, key: InstanceKey, world_aabb: &AABB) {
        let target = self.find_target_node(world_aabb);

        if let Some(entry) = self.object_locations.get_mut(&key) {
            if entry.0 == target {
                entry.1 = *world_aabb;
                return;
            }
        }

        self.remove(key);
        self.nodes[target].objects.push(key);
        self.object_locations.insert(key, (target, *world_aabb));
    }

    fn query_region(&self, region: &AABB, results: &mut Vec<InstanceKey>) {
        if self.nodes.is_empty() {
            return;
        }

        // Root objects may lie outside the octree bounds: always test them individually
        self.test_objects(ROOT, region, results);

        match classify(region, &self.nodes[ROOT].aabb) {
            Containment::Outside => {}
            Containment::Inside => {
                for child in self.child_indices(ROOT, 0) {
                    self.collect_all(child, 1, results);
                }
            }
            Containment::Partial => {
                for child in self.child_indices(ROOT, 0) {
                    self.query_node(child, 1, region, results);
                }
            }
        }
    }

    fn len(&self) -> usize {
        self.object_locations.len()
    }

    fn clear(&mut self) {
        for node in &mut self.nodes {
            node.objects.clear();
        }
        self.object_locations.clear();
    }
}
