//! Geometry buffers and material group metadata
//!
//! A `Geometry` is a set of vertex attribute buffers (position required,
//! normal and color optional) with an optional index buffer and optional
//! material groups. Groups assign disjoint index sub-ranges to material
//! slots; the mesh splitter uses them to carve a multi-material mesh into
//! single-material pieces.

/// Index buffer preserving the source's storage width
#[derive(Debug, Clone)]
pub enum IndexBuffer {
    /// 16-bit indices
    U16(Vec<u16>),
    /// 32-bit indices
    U32(Vec<u32>),
}

impl IndexBuffer {
    /// Number of indices
    pub fn len(&self) -> usize {
        match self {
            Self::U16(v) => v.len(),
            Self::U32(v) => v.len(),
        }
    }

    /// Whether the buffer holds no indices
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get one index widened to u32
    pub fn get(&self, i: usize) -> Option<u32> {
        match self {
            Self::U16(v) => v.get(i).map(|&x| u32::from(x)),
            Self::U32(v) => v.get(i).copied(),
        }
    }

    /// Copy a sub-range into a new buffer of the same width
    ///
    /// The range is clamped to the available data; a start past the end of
    /// the buffer yields `None`.
    pub fn slice(&self, start: usize, count: usize) -> Option<Self> {
        if start > self.len() {
            return None;
        }
        let end = (start + count).min(self.len());
        Some(match self {
            Self::U16(v) => Self::U16(v[start..end].to_vec()),
            Self::U32(v) => Self::U32(v[start..end].to_vec()),
        })
    }
}

/// Contiguous index sub-range bound to one material slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryGroup {
    /// First index of the range
    pub start: usize,
    /// Number of indices in the range
    pub count: usize,
    /// Which entry of the drawable's material list this range uses
    pub material_index: usize,
}

impl GeometryGroup {
    /// Create a new group
    pub fn new(start: usize, count: usize, material_index: usize) -> Self {
        Self {
            start,
            count,
            material_index,
        }
    }
}

/// Vertex attribute buffers with optional index data and material groups
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    positions: Vec<[f32; 3]>,
    normals: Option<Vec<[f32; 3]>>,
    colors: Option<Vec<[f32; 3]>>,
    index: Option<IndexBuffer>,
    groups: Vec<GeometryGroup>,
}

impl Geometry {
    /// Create a geometry from its position attribute
    pub fn new(positions: Vec<[f32; 3]>) -> Self {
        Self {
            positions,
            ..Self::default()
        }
    }

    /// Attach a normal attribute
    pub fn with_normals(mut self, normals: Vec<[f32; 3]>) -> Self {
        self.normals = Some(normals);
        self
    }

    /// Attach a vertex color attribute
    pub fn with_colors(mut self, colors: Vec<[f32; 3]>) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Attach an index buffer
    pub fn with_index(mut self, index: IndexBuffer) -> Self {
        self.index = Some(index);
        self
    }

    /// Attach material group metadata
    pub fn with_groups(mut self, groups: Vec<GeometryGroup>) -> Self {
        self.groups = groups;
        self
    }

    /// Position attribute
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    /// Normal attribute, if present
    pub fn normals(&self) -> Option<&[[f32; 3]]> {
        self.normals.as_deref()
    }

    /// Vertex color attribute, if present
    pub fn colors(&self) -> Option<&[[f32; 3]]> {
        self.colors.as_deref()
    }

    /// Index buffer, if present
    pub fn index(&self) -> Option<&IndexBuffer> {
        self.index.as_ref()
    }

    /// Material group metadata
    pub fn groups(&self) -> &[GeometryGroup] {
        &self.groups
    }

    /// Vertex count: the maximum across populated attributes
    pub fn vertex_count(&self) -> usize {
        let normal_count = self.normals.as_ref().map_or(0, Vec::len);
        let color_count = self.colors.as_ref().map_or(0, Vec::len);
        self.positions.len().max(normal_count).max(color_count)
    }

    /// Index count: the index buffer length, or the vertex count when
    /// the geometry is unindexed
    pub fn index_count(&self) -> usize {
        match &self.index {
            Some(index) => index.len(),
            None => self.vertex_count(),
        }
    }

    /// Number of triangles this geometry draws as a triangle list
    pub fn triangle_count(&self) -> usize {
        self.index_count() / 3
    }

    /// Extract the sub-geometry covered by one material group
    ///
    /// Attributes are copied whole and the index buffer is sliced to the
    /// group's range, so index values keep addressing the copied attributes
    /// directly. An unindexed geometry has no range to slice; the copy then
    /// spans the full attribute data (documented over-draw).
    ///
    /// Returns `None` when the geometry has no position data or the group
    /// range lies entirely outside the index buffer.
    pub fn extract_group(&self, group: GeometryGroup) -> Option<Self> {
        if self.positions.is_empty() {
            return None;
        }

        let index = match &self.index {
            Some(index) => {
                let sliced = index.slice(group.start, group.count)?;
                if sliced.len() < group.count {
                    log::warn!(
                        "group range {}..{} exceeds index buffer of length {}, truncated",
                        group.start,
                        group.start + group.count,
                        index.len()
                    );
                }
                Some(sliced)
            }
            None => None,
        };

        Some(Self {
            positions: self.positions.clone(),
            normals: self.normals.clone(),
            colors: self.colors.clone(),
            index,
            groups: Vec::new(),
        })
    }
}
