//! Fingerprint bucketing of extracted primitives
//!
//! Buckets every primitive by its material fingerprint. The first primitive
//! seen for a fingerprint donates its material instance as the bucket's
//! representative; later primitives with the same fingerprint are
//! draw-interchangeable with it by construction and append without any
//! further check.

use std::sync::Arc;

use fxhash::FxHashMap;

use crate::scene::Material;

use super::fingerprint::{fingerprint, Fingerprint};
use super::walker::Primitive;

/// The set of primitives sharing one material fingerprint
#[derive(Debug)]
pub struct Bucket {
    /// Fingerprint all members share
    pub fingerprint: Fingerprint,
    /// Representative material, taken from the first primitive seen
    pub material: Arc<Material>,
    /// Member primitives in extraction order
    pub primitives: Vec<Primitive>,
}

/// Group primitives into buckets, preserving first-seen bucket order
///
/// Bucket order only affects which material becomes a representative and
/// the order of the assembled output, never the grouping itself.
pub fn group_primitives(primitives: Vec<Primitive>) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut index: FxHashMap<Fingerprint, usize> = FxHashMap::default();

    for primitive in primitives {
        let key = fingerprint(&primitive.material);
        match index.get(&key) {
            Some(&slot) => buckets[slot].primitives.push(primitive),
            None => {
                index.insert(key, buckets.len());
                buckets.push(Bucket {
                    fingerprint: key,
                    material: Arc::clone(&primitive.material),
                    primitives: vec![primitive],
                });
            }
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Mat4;
    use crate::scene::{DrawableKind, Geometry, StandardParams};

    fn primitive_with(material: Arc<Material>, name: &str) -> Primitive {
        Primitive {
            geometry: Arc::new(Geometry::new(vec![[0.0; 3]; 3])),
            material,
            world_transform: Mat4::identity(),
            source_name: name.to_string(),
            source_kind: DrawableKind::Mesh,
        }
    }

    fn red() -> Arc<Material> {
        Arc::new(Material::standard(StandardParams {
            color: 0xff0000,
            roughness: 0.5,
            metalness: 0.0,
            ..StandardParams::default()
        }))
    }

    #[test]
    fn test_equal_fingerprints_share_a_bucket() {
        // Distinct instances with identical fields group together
        let primitives = vec![
            primitive_with(red(), "a"),
            primitive_with(red(), "b"),
            primitive_with(red(), "c"),
        ];

        let buckets = group_primitives(primitives);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].primitives.len(), 3);
    }

    #[test]
    fn test_first_seen_material_is_representative() {
        let first = red();
        let first_id = first.id;
        let primitives = vec![
            primitive_with(first, "a"),
            primitive_with(red(), "b"),
        ];

        let buckets = group_primitives(primitives);
        assert_eq!(buckets[0].material.id, first_id);
    }

    #[test]
    fn test_grouping_is_order_independent() {
        let blue = || {
            Arc::new(Material::standard(StandardParams {
                color: 0x0000ff,
                ..StandardParams::default()
            }))
        };

        let forward = group_primitives(vec![
            primitive_with(red(), "a"),
            primitive_with(blue(), "b"),
            primitive_with(red(), "c"),
        ]);
        let reversed = group_primitives(vec![
            primitive_with(red(), "c"),
            primitive_with(blue(), "b"),
            primitive_with(red(), "a"),
        ]);

        assert_eq!(forward.len(), 2);
        assert_eq!(reversed.len(), 2);

        let sizes = |buckets: &[Bucket]| {
            let mut v: Vec<_> = buckets.iter().map(|b| b.primitives.len()).collect();
            v.sort_unstable();
            v
        };
        assert_eq!(sizes(&forward), sizes(&reversed));
    }

    #[test]
    fn test_opaque_materials_never_group() {
        let shared = Arc::new(Material::opaque());
        let primitives = vec![
            primitive_with(Arc::clone(&shared), "a"),
            primitive_with(Arc::clone(&shared), "b"),
            primitive_with(Arc::new(Material::opaque()), "c"),
        ];

        // Same instance groups with itself, distinct instances never merge
        let buckets = group_primitives(primitives);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].primitives.len(), 2);
        assert_eq!(buckets[1].primitives.len(), 1);
    }

    #[test]
    fn test_member_order_follows_extraction_order() {
        let primitives = vec![
            primitive_with(red(), "first"),
            primitive_with(red(), "second"),
        ];
        let buckets = group_primitives(primitives);
        let names: Vec<_> = buckets[0]
            .primitives
            .iter()
            .map(|p| p.source_name.as_str())
            .collect();
        assert_eq!(names, ["first", "second"]);
    }
}
