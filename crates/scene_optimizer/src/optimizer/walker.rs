//! Primitive extraction via depth-first scene traversal
//!
//! Walks a composite node tree accumulating world transforms and flattens
//! every drawable leaf into `Primitive`s, one per bound material. World
//! transforms are plain matrix products of the ancestor chain; they are
//! never decomposed into translation/rotation/scale, which would drift on
//! non-uniform scale or skew.

use std::sync::Arc;

use crate::foundation::math::{mat4_is_finite, Mat4};
use crate::scene::{DrawableKind, Geometry, Material, NodePayload, SceneNode};

use super::OptimizeError;

/// One extracted (geometry, material, world transform) triple
///
/// Created during traversal, immutable afterwards, and alive only for the
/// duration of one `optimize` call.
#[derive(Debug, Clone)]
pub struct Primitive {
    /// Shared geometry handle
    pub geometry: Arc<Geometry>,
    /// Bound material
    pub material: Arc<Material>,
    /// Snapshot of the world transform at extraction time
    pub world_transform: Mat4,
    /// Name of the source node, for traceability
    pub source_name: String,
    /// Topology kind of the source drawable
    pub source_kind: DrawableKind,
}

/// Extract all primitives below `root`, depth-first in declaration order
///
/// Structural nodes contribute nothing but propagate their transform into
/// the subtree. Drawables with empty geometry are skipped with a warning.
/// A non-finite local transform anywhere in the tree is a caller error and
/// aborts extraction.
pub fn extract_primitives(root: &SceneNode) -> Result<Vec<Primitive>, OptimizeError> {
    let mut primitives = Vec::new();
    walk(root, &Mat4::identity(), &mut primitives)?;
    Ok(primitives)
}

fn walk(
    node: &SceneNode,
    parent_world: &Mat4,
    out: &mut Vec<Primitive>,
) -> Result<(), OptimizeError> {
    if !mat4_is_finite(&node.local_transform) {
        return Err(OptimizeError::NonFiniteTransform {
            node: node.name.clone(),
        });
    }
    let world = parent_world * node.local_transform;

    match &node.payload {
        Some(NodePayload::Drawable(drawable)) => {
            if drawable.geometry.positions().is_empty() {
                log::warn!("drawable '{}' has no position data, skipped", node.name);
            } else {
                for material in drawable.materials.as_slice() {
                    out.push(Primitive {
                        geometry: Arc::clone(&drawable.geometry),
                        material: Arc::clone(material),
                        world_transform: world,
                        source_name: node.name.clone(),
                        source_kind: drawable.kind,
                    });
                }
            }
        }
        Some(NodePayload::Batch(_)) => {
            // Already-optimized content is not re-extracted.
            log::debug!("batch node '{}' encountered during extraction, skipped", node.name);
        }
        None => {}
    }

    for child in &node.children {
        walk(child, &world, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::scene::{Drawable, StandardParams};
    use approx::assert_relative_eq;

    fn triangle() -> Arc<Geometry> {
        Arc::new(Geometry::new(vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        ]))
    }

    fn standard_material() -> Arc<Material> {
        Arc::new(Material::standard(StandardParams::default()))
    }

    #[test]
    fn test_world_transform_accumulates() {
        let child = SceneNode::new("leaf")
            .with_transform(Mat4::new_translation(&Vec3::new(0.0, 2.0, 0.0)))
            .with_drawable(Drawable::mesh(triangle(), standard_material()));
        let root = SceneNode::new("root")
            .with_transform(Mat4::new_translation(&Vec3::new(1.0, 0.0, 0.0)))
            .with_child(child);

        let primitives = extract_primitives(&root).unwrap();
        assert_eq!(primitives.len(), 1);

        let expected = Mat4::new_translation(&Vec3::new(1.0, 2.0, 0.0));
        assert_relative_eq!(primitives[0].world_transform, expected);
    }

    #[test]
    fn test_non_uniform_scale_is_not_decomposed() {
        // scale-then-translate differs from any TRS recomposition that
        // reorders the factors; the raw product must be preserved
        let scale = Mat4::new_nonuniform_scaling(&Vec3::new(2.0, 1.0, 0.5));
        let child = SceneNode::new("leaf")
            .with_transform(Mat4::new_translation(&Vec3::new(1.0, 0.0, 0.0)))
            .with_drawable(Drawable::mesh(triangle(), standard_material()));
        let root = SceneNode::new("root").with_transform(scale).with_child(child);

        let primitives = extract_primitives(&root).unwrap();
        let expected = scale * Mat4::new_translation(&Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(primitives[0].world_transform, expected);
    }

    #[test]
    fn test_multi_material_yields_one_primitive_per_material() {
        let drawable = Drawable::multi_mesh(
            triangle(),
            vec![standard_material(), standard_material(), standard_material()],
        );
        let root = SceneNode::new("root").with_child(SceneNode::new("mesh").with_drawable(drawable));

        let primitives = extract_primitives(&root).unwrap();
        assert_eq!(primitives.len(), 3);
        assert!(primitives.iter().all(|p| p.source_name == "mesh"));
    }

    #[test]
    fn test_structural_nodes_contribute_nothing() {
        let root = SceneNode::new("root")
            .with_child(SceneNode::new("a"))
            .with_child(SceneNode::new("b").with_child(SceneNode::new("c")));
        assert!(extract_primitives(&root).unwrap().is_empty());
    }

    #[test]
    fn test_empty_geometry_is_skipped() {
        let empty = Arc::new(Geometry::default());
        let root = SceneNode::new("root").with_child(
            SceneNode::new("degenerate").with_drawable(Drawable::mesh(empty, standard_material())),
        );
        assert!(extract_primitives(&root).unwrap().is_empty());
    }

    #[test]
    fn test_non_finite_transform_is_fatal() {
        let mut bad = Mat4::identity();
        bad[(0, 3)] = f32::NAN;
        let root = SceneNode::new("root")
            .with_child(SceneNode::new("broken").with_transform(bad));

        let err = extract_primitives(&root).unwrap_err();
        assert!(matches!(err, OptimizeError::NonFiniteTransform { node } if node == "broken"));
    }

    #[test]
    fn test_traversal_order_is_depth_first_declaration_order() {
        let make_leaf = |name: &str| {
            SceneNode::new(name).with_drawable(Drawable::mesh(triangle(), standard_material()))
        };
        let root = SceneNode::new("root")
            .with_child(make_leaf("first").with_child(make_leaf("nested")))
            .with_child(make_leaf("second"));

        let names: Vec<_> = extract_primitives(&root)
            .unwrap()
            .into_iter()
            .map(|p| p.source_name)
            .collect();
        assert_eq!(names, ["first", "nested", "second"]);
    }
}
