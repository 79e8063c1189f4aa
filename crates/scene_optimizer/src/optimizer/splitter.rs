//! Multi-material mesh decomposition
//!
//! Rewrites a composite tree so that every drawable binds exactly one
//! material. Meshes whose geometry declares material groups are carved
//! along those index sub-ranges (lossless); meshes without group metadata
//! get one drawable per material over the entire geometry, which over-draws
//! and is preserved as documented behavior, not fixed.
//!
//! Splitting never fails: a sub-range that cannot be extracted is skipped
//! with a warning and the mesh stays unsplit for that material.

use std::sync::Arc;

use crate::scene::{
    Drawable, DrawableKind, Geometry, Material, MaterialBinding, NodePayload, SceneNode,
};

/// Split every multi-material mesh below `root` into single-material meshes
///
/// Returns a new tree; the input is never mutated. Non-multi-material nodes
/// are shallow-cloned with their subtrees processed recursively.
pub fn split_multi_material(root: &SceneNode) -> SceneNode {
    let mut new_root = root.shallow_clone();
    process_children(root, &mut new_root);
    new_root
}

fn process_children(source: &SceneNode, target: &mut SceneNode) {
    for child in &source.children {
        match child.drawable() {
            Some(drawable) if drawable.kind == DrawableKind::Mesh && drawable.is_multi_material() => {
                split_single_mesh(child, drawable, target);
            }
            _ => {
                let mut cloned = child.shallow_clone();
                process_children(child, &mut cloned);
                target.children.push(cloned);
            }
        }
    }
}

/// Decompose one multi-material mesh into the target's child list
fn split_single_mesh(node: &SceneNode, drawable: &Drawable, target: &mut SceneNode) {
    let geometry = &drawable.geometry;
    let materials = drawable.materials.as_slice();

    if geometry.groups().is_empty() {
        // No sub-range metadata: one drawable per material over the whole
        // geometry. Every material renders the full mesh (over-draw).
        for (i, material) in materials.iter().enumerate() {
            target.children.push(split_piece(
                node,
                drawable,
                Arc::clone(geometry),
                Arc::clone(material),
                i,
            ));
        }
        return;
    }

    for (i, group) in geometry.groups().iter().enumerate() {
        let material = materials
            .get(group.material_index)
            .or_else(|| materials.first())
            .cloned();
        let Some(material) = material else { continue };

        match geometry.extract_group(*group) {
            Some(piece) => {
                target.children.push(split_piece(
                    node,
                    drawable,
                    Arc::new(piece),
                    material,
                    i,
                ));
            }
            None => {
                log::warn!(
                    "could not extract group {} of mesh '{}', left unsplit for material {}",
                    i,
                    node.name,
                    group.material_index
                );
            }
        }
    }
}

/// Build one single-material piece, copying transform and render state
fn split_piece(
    node: &SceneNode,
    drawable: &Drawable,
    geometry: Arc<Geometry>,
    material: Arc<Material>,
    piece_index: usize,
) -> SceneNode {
    let piece = Drawable {
        kind: drawable.kind,
        geometry,
        materials: MaterialBinding::Single(material),
        flags: drawable.flags,
    };
    SceneNode {
        name: format!("{}_material_{}", node.name, piece_index),
        local_transform: node.local_transform,
        transform_auto_update: node.transform_auto_update,
        payload: Some(NodePayload::Drawable(piece)),
        children: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4, Vec3};
    use crate::scene::{
        BasicParams, Geometry, GeometryGroup, IndexBuffer, RenderFlags, StandardParams,
    };

    fn material(color: u32) -> Arc<Material> {
        Arc::new(Material::standard(StandardParams {
            color,
            ..StandardParams::default()
        }))
    }

    /// 150 vertices, 450 indices, two groups of 300 and 150 indices
    fn grouped_geometry() -> Arc<Geometry> {
        let positions = (0..150)
            .map(|i| [i as f32, 0.0, 0.0])
            .collect::<Vec<_>>();
        let indices: Vec<u32> = (0..450).map(|i| (i % 150) as u32).collect();
        Arc::new(
            Geometry::new(positions)
                .with_index(IndexBuffer::U32(indices))
                .with_groups(vec![
                    GeometryGroup::new(0, 300, 0),
                    GeometryGroup::new(300, 150, 1),
                ]),
        )
    }

    #[test]
    fn test_grouped_split_preserves_triangles() {
        let mesh = SceneNode::new("hull").with_drawable(Drawable::multi_mesh(
            grouped_geometry(),
            vec![material(0xff0000), material(0x00ff00)],
        ));
        let root = SceneNode::new("root").with_child(mesh);

        let split = split_multi_material(&root);
        assert_eq!(split.children.len(), 2);

        let t0 = split.children[0].drawable().unwrap().geometry.triangle_count();
        let t1 = split.children[1].drawable().unwrap().geometry.triangle_count();
        assert_eq!(t0, 100);
        assert_eq!(t1, 50);

        // Total triangle count is conserved for well-formed ranges
        assert_eq!(t0 + t1, grouped_geometry().triangle_count());
    }

    #[test]
    fn test_split_pieces_are_single_material_and_named() {
        let mesh = SceneNode::new("hull").with_drawable(Drawable::multi_mesh(
            grouped_geometry(),
            vec![material(0xff0000), material(0x00ff00)],
        ));
        let root = SceneNode::new("root").with_child(mesh);

        let split = split_multi_material(&root);
        for (i, child) in split.children.iter().enumerate() {
            assert_eq!(child.name, format!("hull_material_{}", i));
            assert_eq!(child.drawable().unwrap().materials.len(), 1);
        }
    }

    #[test]
    fn test_rangeless_split_over_draws() {
        let geometry = Arc::new(
            Geometry::new(vec![[0.0; 3]; 30]).with_index(IndexBuffer::U16((0..30).collect())),
        );
        let mesh = SceneNode::new("blob").with_drawable(Drawable::multi_mesh(
            Arc::clone(&geometry),
            vec![material(1), material(2), material(3)],
        ));
        let root = SceneNode::new("root").with_child(mesh);

        let split = split_multi_material(&root);
        assert_eq!(split.children.len(), 3);

        // Every piece references the entire unmodified geometry
        let total: usize = split
            .children
            .iter()
            .map(|c| c.drawable().unwrap().geometry.triangle_count())
            .sum();
        assert_eq!(total, 3 * geometry.triangle_count());
        for child in &split.children {
            assert!(Arc::ptr_eq(&child.drawable().unwrap().geometry, &geometry));
        }
    }

    #[test]
    fn test_transform_and_flags_copied_verbatim() {
        let transform = Mat4::new_translation(&Vec3::new(5.0, 0.0, -2.0));
        let flags = RenderFlags::VISIBLE | RenderFlags::CAST_SHADOW;
        let drawable = Drawable::multi_mesh(
            grouped_geometry(),
            vec![material(0xff0000), material(0x00ff00)],
        )
        .with_flags(flags);
        let root = SceneNode::new("root")
            .with_child(SceneNode::new("hull").with_transform(transform).with_drawable(drawable));

        let split = split_multi_material(&root);
        for child in &split.children {
            assert_eq!(child.local_transform, transform);
            assert_eq!(child.drawable().unwrap().flags, flags);
        }
    }

    #[test]
    fn test_single_material_nodes_pass_through() {
        let basic = Arc::new(Material::basic(BasicParams::default()));
        let leaf = SceneNode::new("leaf").with_drawable(Drawable::mesh(
            Arc::new(Geometry::new(vec![[0.0; 3]; 3])),
            basic,
        ));
        let root = SceneNode::new("root").with_child(SceneNode::new("inner").with_child(leaf));

        let split = split_multi_material(&root);
        assert_eq!(split.node_count(), 3);
        assert_eq!(split.children[0].children[0].name, "leaf");
        assert!(split.children[0].children[0].drawable().is_some());
    }

    #[test]
    fn test_bad_group_is_skipped_not_fatal() {
        let geometry = Arc::new(
            Geometry::new(vec![[0.0; 3]; 3])
                .with_index(IndexBuffer::U16(vec![0, 1, 2]))
                .with_groups(vec![
                    GeometryGroup::new(0, 3, 0),
                    GeometryGroup::new(900, 3, 1), // unresolvable
                ]),
        );
        let mesh = SceneNode::new("hull").with_drawable(Drawable::multi_mesh(
            geometry,
            vec![material(1), material(2)],
        ));
        let root = SceneNode::new("root").with_child(mesh);

        let split = split_multi_material(&root);
        assert_eq!(split.children.len(), 1);
        assert_eq!(split.children[0].name, "hull_material_0");
    }

    #[test]
    fn test_group_with_missing_material_slot_uses_first() {
        let geometry = Arc::new(
            Geometry::new(vec![[0.0; 3]; 3])
                .with_index(IndexBuffer::U16(vec![0, 1, 2]))
                .with_groups(vec![GeometryGroup::new(0, 3, 7)]),
        );
        let first = material(0xabcdef);
        let first_id = first.id;
        let mesh = SceneNode::new("hull")
            .with_drawable(Drawable::multi_mesh(geometry, vec![first, material(2)]));
        let root = SceneNode::new("root").with_child(mesh);

        let split = split_multi_material(&root);
        let bound = &split.children[0].drawable().unwrap().materials.as_slice()[0];
        assert_eq!(bound.id, first_id);
    }
}
