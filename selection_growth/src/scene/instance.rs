/// Scene instance types.
///
/// A SceneInstance is a placed object in a level: a transform, a type
/// classification, optional local-space bounds, an optional asset identity,
/// and links into the parent/child hierarchy. Multi-part placements mark
/// their top node as a grouping root so that selection treats the whole
/// hierarchy as one unit.

use bitflags::bitflags;
use glam::{Mat4, Quat, Vec3};
use slotmap::new_key_type;
use crate::geometry::AABB;

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable handle to a SceneInstance within a Scene.
    ///
    /// Keys remain valid even after other instances are removed.
    /// A key becomes invalid only when its own instance is removed.
    pub struct InstanceKey;
}

// ===== CLASSIFICATION =====

/// Type classification of a placed instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceKind {
    /// Volumetric mesh
    Mesh,
    /// Flat billboard or quad
    Sprite,
    /// Large terrain surface
    Terrain,
    /// Anything else (lights, helpers, empty group nodes)
    Other,
}

impl InstanceKind {
    /// The single mask bit for this kind.
    pub fn mask(self) -> InstanceMask {
        match self {
            InstanceKind::Mesh => InstanceMask::MESH,
            InstanceKind::Sprite => InstanceMask::SPRITE,
            InstanceKind::Terrain => InstanceMask::TERRAIN,
            InstanceKind::Other => InstanceMask::OTHER,
        }
    }
}

bitflags! {
    /// Set of instance kinds, used for query filters and bounds computation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct InstanceMask: u32 {
        const MESH    = 1 << 0;
        const SPRITE  = 1 << 1;
        const TERRAIN = 1 << 2;
        const OTHER   = 1 << 3;

        /// Kinds that may act as growth sources and candidates by default
        const GROWABLE = Self::MESH.bits() | Self::SPRITE.bits();
        /// Kinds whose geometry contributes to hierarchy bounds by default
        const RENDERABLE = Self::MESH.bits() | Self::SPRITE.bits();
    }
}

impl InstanceMask {
    /// `true` if `kind` is in this mask.
    pub fn includes(self, kind: InstanceKind) -> bool {
        self.contains(kind.mask())
    }
}

/// Opaque asset identity tag ("same prefab / same source asset").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub u64);

// ===== TRANSFORM =====

/// Local transform relative to the parent instance (or world for roots).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Identity transform moved to `position`.
    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Self::IDENTITY }
    }

    pub fn with_rotation(self, rotation: Quat) -> Self {
        Self { rotation, ..self }
    }

    pub fn with_scale(self, scale: Vec3) -> Self {
        Self { scale, ..self }
    }

    /// Scale, then rotate, then translate.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// ===== DESCRIPTOR =====

/// Everything needed to place a new instance.
#[derive(Debug, Clone)]
pub struct SceneInstanceDesc {
    pub name: String,
    pub kind: InstanceKind,
    /// Asset identity, `None` for instances without a source asset
    pub asset_id: Option<AssetId>,
    pub transform: Transform,
    /// Local-space geometry bounds, `None` for pure group nodes
    pub local_bounds: Option<AABB>,
    /// Treat this node and its descendants as one selectable unit
    pub grouping_root: bool,
}

impl SceneInstanceDesc {
    /// A mesh with unit-cube bounds at `position`.
    pub fn mesh(name: &str, position: Vec3) -> Self {
        Self {
            name: name.to_string(),
            kind: InstanceKind::Mesh,
            asset_id: None,
            transform: Transform::from_position(position),
            local_bounds: Some(AABB::new(Vec3::splat(-0.5), Vec3::splat(0.5))),
            grouping_root: false,
        }
    }

    pub fn with_kind(mut self, kind: InstanceKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_asset(mut self, asset_id: AssetId) -> Self {
        self.asset_id = Some(asset_id);
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self
    }

    pub fn with_bounds(mut self, local_bounds: Option<AABB>) -> Self {
        self.local_bounds = local_bounds;
        self
    }

    pub fn as_grouping_root(mut self) -> Self {
        self.grouping_root = true;
        self
    }
}

// ===== SCENE INSTANCE =====

/// A placed object owned by a Scene.
#[derive(Debug, Clone)]
pub struct SceneInstance {
    name: String,
    kind: InstanceKind,
    asset_id: Option<AssetId>,
    transform: Transform,
    local_bounds: Option<AABB>,
    grouping_root: bool,
    parent: Option<InstanceKey>,
    children: Vec<InstanceKey>,
}

impl SceneInstance {
    pub(crate) fn from_desc(desc: SceneInstanceDesc) -> Self {
        Self {
            name: desc.name,
            kind: desc.kind,
            asset_id: desc.asset_id,
            transform: desc.transform,
            local_bounds: desc.local_bounds,
            grouping_root: desc.grouping_root,
            parent: None,
            children: Vec::new(),
        }
    }

    // ===== GETTERS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> InstanceKind {
        self.kind
    }

    pub fn asset_id(&self) -> Option<AssetId> {
        self.asset_id
    }

    /// Transform relative to the parent.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Geometry bounds in this instance's local space.
    pub fn local_bounds(&self) -> Option<&AABB> {
        self.local_bounds.as_ref()
    }

    pub fn is_grouping_root(&self) -> bool {
        self.grouping_root
    }

    pub fn parent(&self) -> Option<InstanceKey> {
        self.parent
    }

    pub fn children(&self) -> &[InstanceKey] {
        &self.children
    }

    // ===== CRATE-INTERNAL MUTATION (via Scene) =====

    pub(crate) fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub(crate) fn set_parent(&mut self, parent: Option<InstanceKey>) {
        self.parent = parent;
    }

    pub(crate) fn add_child(&mut self, child: InstanceKey) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    pub(crate) fn remove_child(&mut self, child: InstanceKey) {
        self.children.retain(|&c| c != child);
    }
}
