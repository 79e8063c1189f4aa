//! Scene optimizer pipeline
//!
//! Reduces the draw-call count of a composite scene by deduplicating
//! materials and packing repeated drawables into batches:
//!
//! ```text
//! input tree
//!    │  split_multi_material      (one material per drawable)
//!    ▼
//! extract_primitives             (flat list, world transforms)
//!    │  discard unsupported kinds
//!    ▼
//! fingerprint + group            (buckets of draw-interchangeable prims)
//!    ▼
//! assemble                       (N drawables or one batch per bucket)
//!    ▼
//! optimized tree
//! ```
//!
//! Data flows strictly forward; no stage mutates an earlier stage's output.
//! `optimize` is synchronous and run-to-completion, intended to run once
//! after scene load rather than per frame. One optimizer instance holds
//! transient bucket state and must not be shared across concurrent calls;
//! use one instance per thread or serialize externally.

mod batch_builder;
mod fingerprint;
mod grouper;
mod splitter;
mod walker;


pub use batch_builder::build_batch;
pub use fingerprint::{fingerprint, Fingerprint};
pub use grouper::{group_primitives, Bucket};
pub use splitter::split_multi_material;
pub use walker::{extract_primitives, Primitive};

use std::sync::Arc;

use thiserror::Error;

use crate::config::OptimizerConfig;
use crate::foundation::time::Stopwatch;
use crate::scene::{Drawable, DrawableKind, Material, MaterialBinding, NodePayload, SceneNode};

/// Errors that abort an `optimize` call
///
/// Everything data-shaped (missing attributes, empty geometry, unknown
/// kinds, bad group ranges) is skip-and-log instead; only caller programming
/// errors surface here.
#[derive(Debug, Error)]
pub enum OptimizeError {
    /// A node's local transform contains NaN or infinity
    #[error("non-finite transform on node '{node}'")]
    NonFiniteTransform {
        /// Name of the offending node
        node: String,
    },
}

/// Statistics from the most recent `optimize` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimizationStats {
    /// Primitives extracted from the input scene
    pub total_primitives: usize,
    /// Distinct material fingerprints (bucket count)
    pub unique_materials: usize,
    /// Batches emitted
    pub batched_mesh_count: usize,
    /// Instances packed across all batches
    pub batched_instance_count: usize,
    /// Individual drawables emitted
    pub single_object_count: usize,
    /// Primitives dropped because their kind or geometry could not be rebuilt
    pub dropped_primitive_count: usize,
}

/// Draw-call reducing scene optimizer
///
/// Holds the configuration and the transient bucket state of the last run.
/// Not safe for concurrent invocation on the same instance; there is no
/// internal locking.
pub struct SceneOptimizer {
    config: OptimizerConfig,
    buckets: Vec<Bucket>,
    stats: OptimizationStats,
}

impl Default for SceneOptimizer {
    fn default() -> Self {
        Self::with_default_config()
    }
}

impl SceneOptimizer {
    /// Create an optimizer with a validated configuration
    pub fn new(config: OptimizerConfig) -> Result<Self, crate::config::ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            buckets: Vec::new(),
            stats: OptimizationStats::default(),
        })
    }

    /// Create an optimizer with the default configuration
    pub fn with_default_config() -> Self {
        Self {
            config: OptimizerConfig::default(),
            buckets: Vec::new(),
            stats: OptimizationStats::default(),
        }
    }

    /// The active configuration
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Statistics gathered by the most recent `optimize` call
    pub fn stats(&self) -> OptimizationStats {
        self.stats
    }

    /// Split every multi-material mesh in the tree into single-material
    /// meshes
    ///
    /// See [`split_multi_material`]. Exposed on the optimizer so callers can
    /// run the splitter ahead of `optimize` when their scenes carry
    /// multi-material geometry with group metadata.
    pub fn split_multi_material_meshes(&self, root: &SceneNode) -> SceneNode {
        split_multi_material(root)
    }

    /// Produce an optimized scene semantically equivalent to the input
    ///
    /// The input is only read, never mutated. Returns a fresh root whose
    /// children are single-material drawables and/or batches, one group of
    /// children per material bucket.
    pub fn optimize(&mut self, scene: &SceneNode) -> Result<SceneNode, OptimizeError> {
        self.buckets.clear();
        self.stats = OptimizationStats::default();

        let stopwatch = Stopwatch::start_new();
        let primitives = extract_primitives(scene)?;
        log::debug!(
            "extracted {} primitives in {:.2} ms",
            primitives.len(),
            stopwatch.elapsed_ms()
        );
        self.stats.total_primitives = primitives.len();
        let primitives = discard_unsupported(primitives, &mut self.stats);

        let stopwatch = Stopwatch::start_new();
        self.buckets = group_primitives(primitives);
        log::debug!(
            "grouped into {} buckets in {:.2} ms",
            self.buckets.len(),
            stopwatch.elapsed_ms()
        );
        self.stats.unique_materials = self.buckets.len();

        let stopwatch = Stopwatch::start_new();
        let mut optimized = SceneNode::new("optimized_scene");
        for bucket in &self.buckets {
            assemble_bucket(bucket, self.config.batch_threshold, &mut optimized, &mut self.stats);
        }
        log::debug!(
            "assembled output scene in {:.2} ms ({} batches, {} singles, {} dropped)",
            stopwatch.elapsed_ms(),
            self.stats.batched_mesh_count,
            self.stats.single_object_count,
            self.stats.dropped_primitive_count
        );

        Ok(optimized)
    }
}

/// Remove primitives whose drawable kind has no optimized representation
///
/// `Points` drawables can be neither rebuilt individually nor packed into a
/// batch. They are excluded before grouping, so a large bucket of them never
/// reaches the batch path; each exclusion is logged and counted as dropped.
fn discard_unsupported(
    primitives: Vec<Primitive>,
    stats: &mut OptimizationStats,
) -> Vec<Primitive> {
    primitives
        .into_iter()
        .filter(|primitive| {
            let supported = primitive.source_kind != DrawableKind::Points;
            if !supported {
                log::warn!(
                    "drawable kind {:?} of '{}' is not supported, dropped",
                    primitive.source_kind,
                    primitive.source_name
                );
                stats.dropped_primitive_count += 1;
            }
            supported
        })
        .collect()
}

/// Emit a bucket's output: individual drawables or one batch
///
/// Line materials always take the per-instance path regardless of count;
/// that exclusion is specific to the line family and is not generalized to
/// other kinds.
fn assemble_bucket(
    bucket: &Bucket,
    batch_threshold: usize,
    out: &mut SceneNode,
    stats: &mut OptimizationStats,
) {
    let take_batch_path =
        !bucket.material.is_line() && bucket.primitives.len() > batch_threshold;

    if take_batch_path {
        let (batch, dropped) = build_batch(bucket);
        stats.dropped_primitive_count += dropped;
        stats.batched_instance_count += batch.instance_count();
        stats.batched_mesh_count += 1;

        let name = format!("batch_{}", bucket.fingerprint);
        out.add_child(SceneNode {
            name,
            local_transform: crate::foundation::math::Mat4::identity(),
            transform_auto_update: false,
            payload: Some(NodePayload::Batch(Arc::new(batch))),
            children: Vec::new(),
        });
    } else {
        for primitive in &bucket.primitives {
            out.add_child(single_object(primitive, &bucket.material));
            stats.single_object_count += 1;
        }
    }
}

/// Rebuild one primitive as an individual drawable node
///
/// The node's transform is set once from the primitive's world transform and
/// marked non-auto-updating: the world placement is baked in, and callers
/// must not mutate it without re-deriving a new transform.
fn single_object(primitive: &Primitive, material: &Arc<Material>) -> SceneNode {
    let drawable = Drawable::new(
        primitive.source_kind,
        Arc::clone(&primitive.geometry),
        MaterialBinding::Single(Arc::clone(material)),
    );
    SceneNode {
        name: primitive.source_name.clone(),
        local_transform: primitive.world_transform,
        transform_auto_update: false,
        payload: Some(NodePayload::Drawable(drawable)),
        children: Vec::new(),
    }
}
