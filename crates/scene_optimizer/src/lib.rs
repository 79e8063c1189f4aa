//! # Scene Optimizer
//!
//! Draw-call reduction for composite 3D scene graphs.
//!
//! Takes an arbitrary composite scene (possibly thousands of individually
//! transformed drawables) and produces a semantically equivalent scene with
//! far fewer draw-call units by:
//!
//! - **Splitting** multi-material meshes into single-material meshes
//! - **Deduplicating** materials by a content-derived fingerprint
//! - **Batching** repeated single-material drawables into capacity-bounded
//!   containers carrying per-instance transforms
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_optimizer::prelude::*;
//! use std::sync::Arc;
//!
//! let material = Arc::new(Material::standard(StandardParams {
//!     color: 0xff0000,
//!     roughness: 0.5,
//!     ..StandardParams::default()
//! }));
//! let geometry = Arc::new(Geometry::new(vec![
//!     [0.0, 0.0, 0.0],
//!     [1.0, 0.0, 0.0],
//!     [0.0, 1.0, 0.0],
//! ]));
//!
//! let mut scene = SceneNode::new("scene");
//! for i in 0..10 {
//!     let transform = Mat4::new_translation(&Vec3::new(i as f32, 0.0, 0.0));
//!     scene.add_child(
//!         SceneNode::new(format!("box_{i}"))
//!             .with_transform(transform)
//!             .with_drawable(Drawable::mesh(Arc::clone(&geometry), Arc::clone(&material))),
//!     );
//! }
//!
//! let mut optimizer = SceneOptimizer::with_default_config();
//! let optimized = optimizer.optimize(&scene).unwrap();
//! assert_eq!(optimizer.stats().batched_mesh_count, 1);
//! assert_eq!(optimized.children.len(), 1);
//! ```
//!
//! Cameras, lights, asset loading and the render loop are external
//! collaborators: this crate only models the scene data the optimizer reads
//! and the batch containers it emits.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod scene;
pub mod optimizer;
pub mod config;

pub use config::{Config, ConfigError, OptimizerConfig};
pub use optimizer::{OptimizationStats, OptimizeError, SceneOptimizer};

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, OptimizerConfig},
        foundation::math::{Mat4, Vec3},
        optimizer::{OptimizationStats, OptimizeError, SceneOptimizer},
        scene::{
            BasicParams, BatchedMesh, Drawable, DrawableKind, Geometry, GeometryGroup,
            IndexBuffer, LineParams, Material, MaterialBinding, NodePayload, PhysicalParams,
            RenderFlags, SceneNode, StandardParams, TextureDesc, TextureHandle, TextureRegistry,
        },
    };
}
