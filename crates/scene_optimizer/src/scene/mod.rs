//! Scene graph data model consumed by the optimizer
//!
//! Provides the composite node tree, geometry buffers, material variants and
//! texture identities that the optimizer reads. The optimizer never mutates
//! input nodes; drawable payloads are shared via `Arc` so that split and
//! optimized scenes can reference source geometry without copying it.
//!
//! ## Structure
//!
//! ```text
//! SceneNode (name, local transform, children)
//!      └── NodePayload
//!            ├── Drawable (kind + geometry + material binding + flags)
//!            └── BatchedMesh (one material, N packed instances)
//! ```
//!
//! Rendering itself (cameras, lights, asset IO, the render loop) is an
//! external collaborator; this module only models what the optimizer needs.

mod node;
mod geometry;
mod material;
mod batch;
mod texture;

pub use node::{Drawable, DrawableKind, MaterialBinding, NodePayload, RenderFlags, SceneNode};
pub use geometry::{Geometry, GeometryGroup, IndexBuffer};
pub use material::{
    BasicParams, LineParams, Material, MaterialId, MaterialKind, MaterialParams, PhysicalParams,
    StandardParams,
};
pub use batch::{BatchError, BatchInstance, BatchedMesh, SubGeometry};
pub use texture::{TextureDesc, TextureHandle, TextureRegistry};
