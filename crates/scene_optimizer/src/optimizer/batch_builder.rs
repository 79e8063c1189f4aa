//! Batch assembly for large buckets
//!
//! Packs every primitive of a bucket into one `BatchedMesh`. Capacity is
//! computed before any data is written: the maximum per-primitive vertex and
//! index counts, each multiplied by the bucket's instance count. For
//! heterogeneous buckets this over-allocates relative to summing exact
//! counts; the bound guarantees that no primitive's data is ever truncated.

use std::sync::Arc;

use crate::scene::BatchedMesh;

use super::grouper::Bucket;

/// Pack all primitives of a bucket into one batch
///
/// Any per-primitive packing failure is logged and drops only that
/// primitive; the rest of the bucket is unaffected. Returns the batch and
/// the number of dropped primitives.
pub fn build_batch(bucket: &Bucket) -> (BatchedMesh, usize) {
    let mut max_vertex_count = 0;
    let mut max_index_count = 0;
    for primitive in &bucket.primitives {
        max_vertex_count = max_vertex_count.max(primitive.geometry.vertex_count());
        max_index_count = max_index_count.max(primitive.geometry.index_count());
    }
    let max_instances = bucket.primitives.len();

    let mut batch = BatchedMesh::new(
        Arc::clone(&bucket.material),
        max_instances,
        max_vertex_count * max_instances,
        max_index_count * max_instances,
    );

    let mut dropped = 0;
    for primitive in &bucket.primitives {
        let result = batch.add_geometry(&primitive.geometry).and_then(|geometry_id| {
            let instance_id = batch.add_instance(geometry_id)?;
            batch.set_matrix_at(instance_id, primitive.world_transform)?;
            batch.set_source_at(instance_id, primitive.source_name.as_str())
        });

        if let Err(err) = result {
            log::warn!(
                "failed to pack '{}' into batch {}: {}",
                primitive.source_name,
                bucket.fingerprint,
                err
            );
            dropped += 1;
        }
    }

    (batch, dropped)
}
