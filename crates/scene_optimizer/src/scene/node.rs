//! Composite scene nodes and drawable payloads

use std::sync::Arc;

use bitflags::bitflags;

use crate::foundation::math::Mat4;

use super::batch::BatchedMesh;
use super::geometry::Geometry;
use super::material::Material;

bitflags! {
    /// Render-state flags carried by a drawable
    ///
    /// Copied verbatim onto every piece produced by the mesh splitter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RenderFlags: u8 {
        /// Drawable is rendered at all
        const VISIBLE = 1 << 0;
        /// Drawable casts shadows
        const CAST_SHADOW = 1 << 1;
        /// Drawable receives shadows
        const RECEIVE_SHADOW = 1 << 2;
    }
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// How a drawable's geometry is interpreted by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawableKind {
    /// Triangle mesh
    Mesh,
    /// Connected line strip
    Line,
    /// Independent line segments
    LineSegments,
    /// Point cloud; the optimizer cannot rebuild these and drops them
    /// with a logged warning
    Points,
}

impl DrawableKind {
    /// Whether this kind renders line topology
    pub fn is_line_like(self) -> bool {
        matches!(self, Self::Line | Self::LineSegments)
    }
}

/// One-or-many material bindings of a drawable
#[derive(Debug, Clone)]
pub enum MaterialBinding {
    /// Single material covering the whole geometry
    Single(Arc<Material>),
    /// Material list addressed by geometry group `material_index`
    Multi(Vec<Arc<Material>>),
}

impl MaterialBinding {
    /// View the binding as a slice, normalizing the singleton case
    pub fn as_slice(&self) -> &[Arc<Material>] {
        match self {
            Self::Single(material) => std::slice::from_ref(material),
            Self::Multi(materials) => materials,
        }
    }

    /// Number of bound materials
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether no material is bound
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

/// Renderable content of a scene node
#[derive(Debug, Clone)]
pub struct Drawable {
    /// Topology kind
    pub kind: DrawableKind,
    /// Shared geometry handle
    pub geometry: Arc<Geometry>,
    /// Bound material(s)
    pub materials: MaterialBinding,
    /// Render-state flags
    pub flags: RenderFlags,
}

impl Drawable {
    /// Create a drawable of any kind
    pub fn new(kind: DrawableKind, geometry: Arc<Geometry>, materials: MaterialBinding) -> Self {
        Self {
            kind,
            geometry,
            materials,
            flags: RenderFlags::default(),
        }
    }

    /// Create a single-material triangle mesh
    pub fn mesh(geometry: Arc<Geometry>, material: Arc<Material>) -> Self {
        Self::new(DrawableKind::Mesh, geometry, MaterialBinding::Single(material))
    }

    /// Create a multi-material triangle mesh
    pub fn multi_mesh(geometry: Arc<Geometry>, materials: Vec<Arc<Material>>) -> Self {
        Self::new(DrawableKind::Mesh, geometry, MaterialBinding::Multi(materials))
    }

    /// Create a line drawable
    pub fn line(geometry: Arc<Geometry>, material: Arc<Material>) -> Self {
        Self::new(DrawableKind::Line, geometry, MaterialBinding::Single(material))
    }

    /// Set render flags
    pub fn with_flags(mut self, flags: RenderFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Whether this drawable binds more than one material
    pub fn is_multi_material(&self) -> bool {
        self.materials.len() > 1
    }
}

/// Content attached to a scene node
#[derive(Debug, Clone)]
pub enum NodePayload {
    /// An individual drawable
    Drawable(Drawable),
    /// A packed batch of instances sharing one material
    Batch(Arc<BatchedMesh>),
}

/// A node of the composite scene graph
///
/// Carries a local transform, an ordered child list and optional renderable
/// content. World transforms are never stored; they are accumulated during
/// traversal as `parent_world * local`.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Node name, used in diagnostics and split-piece naming
    pub name: String,
    /// Transform relative to the parent node
    pub local_transform: Mat4,
    /// Whether the transform may still be recomputed by the host
    /// application; output drawables carry a frozen world transform and
    /// set this to `false`
    pub transform_auto_update: bool,
    /// Optional renderable content
    pub payload: Option<NodePayload>,
    /// Ordered child nodes
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Create a structural node with an identity transform
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local_transform: Mat4::identity(),
            transform_auto_update: true,
            payload: None,
            children: Vec::new(),
        }
    }

    /// Set the local transform
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.local_transform = transform;
        self
    }

    /// Attach a drawable payload
    pub fn with_drawable(mut self, drawable: Drawable) -> Self {
        self.payload = Some(NodePayload::Drawable(drawable));
        self
    }

    /// Attach a child node
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Add a child node
    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    /// Borrow the drawable payload, if any
    pub fn drawable(&self) -> Option<&Drawable> {
        match &self.payload {
            Some(NodePayload::Drawable(drawable)) => Some(drawable),
            _ => None,
        }
    }

    /// Borrow the batch payload, if any
    pub fn batch(&self) -> Option<&BatchedMesh> {
        match &self.payload {
            Some(NodePayload::Batch(batch)) => Some(batch),
            _ => None,
        }
    }

    /// Clone the node itself without its children
    ///
    /// Payloads are shared, not copied; the clone references the same
    /// geometry and materials.
    pub fn shallow_clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            local_transform: self.local_transform,
            transform_auto_update: self.transform_auto_update,
            payload: self.payload.clone(),
            children: Vec::new(),
        }
    }

    /// Total number of nodes in this subtree, including self
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }

    /// Number of drawable leaves in this subtree
    pub fn drawable_count(&self) -> usize {
        let own = usize::from(self.drawable().is_some());
        own + self
            .children
            .iter()
            .map(SceneNode::drawable_count)
            .sum::<usize>()
    }
}
