//! Capacity-bounded batch containers
//!
//! A `BatchedMesh` is a single draw-call unit: one material, preallocated
//! vertex/index storage, and one transform slot per packed instance. Vertex
//! and index capacity are fixed at construction; adding data past either
//! bound is an error rather than a reallocation, keeping the container's
//! memory footprint exactly what was budgeted for it.

use std::sync::Arc;

use thiserror::Error;

use crate::foundation::math::Mat4;

use super::geometry::Geometry;
use super::material::Material;

/// Errors raised by batch packing operations
#[derive(Debug, Error)]
pub enum BatchError {
    /// Adding a geometry would exceed the preallocated vertex storage
    #[error("vertex capacity exceeded: need {needed}, {available} left")]
    VertexCapacityExceeded {
        /// Vertices required by the rejected geometry
        needed: usize,
        /// Remaining vertex capacity
        available: usize,
    },

    /// Adding a geometry would exceed the preallocated index storage
    #[error("index capacity exceeded: need {needed}, {available} left")]
    IndexCapacityExceeded {
        /// Indices required by the rejected geometry
        needed: usize,
        /// Remaining index capacity
        available: usize,
    },

    /// All instance slots are occupied
    #[error("instance capacity of {max} exceeded")]
    InstanceCapacityExceeded {
        /// Maximum number of instances
        max: usize,
    },

    /// Sub-geometry index out of range
    #[error("no sub-geometry with index {0}")]
    InvalidGeometryIndex(usize),

    /// Instance index out of range
    #[error("no instance with index {0}")]
    InvalidInstanceIndex(usize),
}

/// Range of the batch buffers occupied by one registered sub-geometry
#[derive(Debug, Clone, Copy)]
pub struct SubGeometry {
    /// First vertex of the range
    pub vertex_start: usize,
    /// Number of vertices
    pub vertex_count: usize,
    /// First index of the range
    pub index_start: usize,
    /// Number of indices
    pub index_count: usize,
}

/// One packed instance inside a batch
#[derive(Debug, Clone)]
pub struct BatchInstance {
    /// Which registered sub-geometry this instance draws
    pub geometry_index: usize,
    /// World transform of the instance
    pub transform: Mat4,
    /// Name of the source node, retained for traceability; not part of the
    /// rendered result
    pub source_name: Option<String>,
}

/// A single draw-call unit holding multiple geometry instances
#[derive(Debug)]
pub struct BatchedMesh {
    material: Arc<Material>,
    max_instances: usize,
    max_vertices: usize,
    max_indices: usize,

    positions: Vec<[f32; 3]>,
    normals: Option<Vec<[f32; 3]>>,
    colors: Option<Vec<[f32; 3]>>,
    indices: Vec<u32>,

    sub_geometries: Vec<SubGeometry>,
    instances: Vec<BatchInstance>,
}

impl BatchedMesh {
    /// Create a batch with preallocated storage
    ///
    /// All vertex and index memory is reserved up front from the given
    /// capacities; later packing never reallocates.
    pub fn new(
        material: Arc<Material>,
        max_instances: usize,
        max_vertices: usize,
        max_indices: usize,
    ) -> Self {
        Self {
            material,
            max_instances,
            max_vertices,
            max_indices,
            positions: Vec::with_capacity(max_vertices),
            normals: None,
            colors: None,
            indices: Vec::with_capacity(max_indices),
            sub_geometries: Vec::with_capacity(max_instances),
            instances: Vec::with_capacity(max_instances),
        }
    }

    /// Register a geometry as a sub-geometry of this batch
    ///
    /// Copies the geometry's attribute and index data into the batch buffers
    /// and returns the sub-geometry index. Unindexed geometries get a
    /// sequential index range so every sub-geometry is drawable the same way.
    ///
    /// Index values are copied as-is, relative to the sub-geometry's own
    /// vertices: drawing a sub-geometry means issuing its index range with
    /// `vertex_start` as the base-vertex offset. The flat buffers are not
    /// one self-contained index mesh.
    pub fn add_geometry(&mut self, geometry: &Geometry) -> Result<usize, BatchError> {
        let vertex_count = geometry.vertex_count();
        let index_count = geometry.index_count();

        let vertices_used = self.positions.len();
        if vertices_used + vertex_count > self.max_vertices {
            return Err(BatchError::VertexCapacityExceeded {
                needed: vertex_count,
                available: self.max_vertices - vertices_used,
            });
        }
        if self.indices.len() + index_count > self.max_indices {
            return Err(BatchError::IndexCapacityExceeded {
                needed: index_count,
                available: self.max_indices - self.indices.len(),
            });
        }

        let vertex_start = self.positions.len();
        let index_start = self.indices.len();

        self.positions.extend_from_slice(geometry.positions());
        // Attribute buffers may be shorter than the vertex count when another
        // attribute is the longest one; pad so ranges stay aligned.
        self.positions.resize(vertex_start + vertex_count, [0.0; 3]);

        Self::append_attribute(
            &mut self.normals,
            geometry.normals(),
            vertex_start,
            vertex_count,
        );
        Self::append_attribute(
            &mut self.colors,
            geometry.colors(),
            vertex_start,
            vertex_count,
        );

        match geometry.index() {
            Some(index) => {
                for i in 0..index.len() {
                    // get() cannot fail inside 0..len
                    if let Some(value) = index.get(i) {
                        self.indices.push(value);
                    }
                }
            }
            None => {
                // Sequential indices spanning the copied vertices
                self.indices
                    .extend((0..vertex_count).map(|i| i as u32));
            }
        }

        self.sub_geometries.push(SubGeometry {
            vertex_start,
            vertex_count,
            index_start,
            index_count,
        });
        Ok(self.sub_geometries.len() - 1)
    }

    /// Allocate an instance slot bound to a registered sub-geometry
    ///
    /// The slot starts with an identity transform; callers write the real
    /// transform with [`set_matrix_at`](Self::set_matrix_at).
    pub fn add_instance(&mut self, geometry_index: usize) -> Result<usize, BatchError> {
        if geometry_index >= self.sub_geometries.len() {
            return Err(BatchError::InvalidGeometryIndex(geometry_index));
        }
        if self.instances.len() >= self.max_instances {
            return Err(BatchError::InstanceCapacityExceeded {
                max: self.max_instances,
            });
        }

        self.instances.push(BatchInstance {
            geometry_index,
            transform: Mat4::identity(),
            source_name: None,
        });
        Ok(self.instances.len() - 1)
    }

    /// Write an instance's transform slot
    pub fn set_matrix_at(&mut self, instance: usize, transform: Mat4) -> Result<(), BatchError> {
        let slot = self
            .instances
            .get_mut(instance)
            .ok_or(BatchError::InvalidInstanceIndex(instance))?;
        slot.transform = transform;
        Ok(())
    }

    /// Attach the source node name to an instance for traceability
    pub fn set_source_at(
        &mut self,
        instance: usize,
        source_name: impl Into<String>,
    ) -> Result<(), BatchError> {
        let slot = self
            .instances
            .get_mut(instance)
            .ok_or(BatchError::InvalidInstanceIndex(instance))?;
        slot.source_name = Some(source_name.into());
        Ok(())
    }

    /// Read an instance's transform
    pub fn matrix_at(&self, instance: usize) -> Option<&Mat4> {
        self.instances.get(instance).map(|i| &i.transform)
    }

    /// Material bound to this batch
    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    /// Number of packed instances
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Number of registered sub-geometries
    pub fn sub_geometry_count(&self) -> usize {
        self.sub_geometries.len()
    }

    /// Packed instances
    pub fn instances(&self) -> &[BatchInstance] {
        &self.instances
    }

    /// Registered sub-geometry ranges
    pub fn sub_geometries(&self) -> &[SubGeometry] {
        &self.sub_geometries
    }

    /// Packed position data
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    /// Packed normal data, present once any sub-geometry provides normals
    pub fn normals(&self) -> Option<&[[f32; 3]]> {
        self.normals.as_deref()
    }

    /// Packed vertex color data, present once any sub-geometry provides
    /// colors
    pub fn colors(&self) -> Option<&[[f32; 3]]> {
        self.colors.as_deref()
    }

    /// Packed index data
    ///
    /// Values are relative to each sub-geometry's `vertex_start`, not to the
    /// start of the position buffer; consume per [`SubGeometry`] range with a
    /// base-vertex offset.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Vertices written so far
    pub fn vertices_used(&self) -> usize {
        self.positions.len()
    }

    /// Indices written so far
    pub fn indices_used(&self) -> usize {
        self.indices.len()
    }

    /// Preallocated vertex capacity
    pub fn max_vertices(&self) -> usize {
        self.max_vertices
    }

    /// Preallocated index capacity
    pub fn max_indices(&self) -> usize {
        self.max_indices
    }

    /// Maximum number of instances
    pub fn max_instances(&self) -> usize {
        self.max_instances
    }

    /// Append one optional attribute, keeping it aligned with positions
    ///
    /// A batch attribute buffer exists as soon as any sub-geometry provides
    /// the attribute; vertices of sub-geometries lacking it are zero-filled.
    fn append_attribute(
        buffer: &mut Option<Vec<[f32; 3]>>,
        data: Option<&[[f32; 3]]>,
        vertex_start: usize,
        vertex_count: usize,
    ) {
        if data.is_none() && buffer.is_none() {
            return;
        }
        let buffer = buffer.get_or_insert_with(Vec::new);
        buffer.resize(vertex_start, [0.0; 3]);
        if let Some(data) = data {
            buffer.extend_from_slice(data);
        }
        buffer.resize(vertex_start + vertex_count, [0.0; 3]);
    }
}
