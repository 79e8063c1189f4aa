//! Scene optimizer demo
//!
//! Builds a synthetic town scene (many repeated house meshes, a couple of
//! multi-material landmarks, wireframe street lines), runs the optimizer and
//! prints before/after statistics.

use std::sync::Arc;

use scene_optimizer::prelude::*;

// Town layout
const HOUSE_ROWS: usize = 10;
const HOUSE_COLS: usize = 10;
const HOUSE_SPACING: f32 = 8.0;
const STREET_COUNT: usize = 4;

/// Unit cube with an index buffer, shared by every house
fn house_geometry() -> Arc<Geometry> {
    let positions = vec![
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 1.0, 1.0],
    ];
    #[rustfmt::skip]
    let indices: Vec<u16> = vec![
        0, 1, 2, 0, 2, 3, // front
        5, 4, 7, 5, 7, 6, // back
        4, 0, 3, 4, 3, 7, // left
        1, 5, 6, 1, 6, 2, // right
        3, 2, 6, 3, 6, 7, // top
        4, 5, 1, 4, 1, 0, // bottom
    ];
    Arc::new(Geometry::new(positions).with_index(IndexBuffer::U16(indices)))
}

/// Two-group landmark geometry: walls and roof use different materials
fn landmark_geometry() -> Arc<Geometry> {
    let positions: Vec<[f32; 3]> = (0..24).map(|i| [i as f32, 0.0, 0.0]).collect();
    let indices: Vec<u16> = (0..24).collect();
    Arc::new(
        Geometry::new(positions)
            .with_index(IndexBuffer::U16(indices))
            .with_groups(vec![
                GeometryGroup::new(0, 18, 0),
                GeometryGroup::new(18, 6, 1),
            ]),
    )
}

fn street_geometry(length: f32) -> Arc<Geometry> {
    Arc::new(Geometry::new(vec![[0.0, 0.0, 0.0], [length, 0.0, 0.0]]))
}

fn build_town() -> SceneNode {
    let mut town = SceneNode::new("town");

    // Every house gets its own material instance, but the fields are
    // identical, so the optimizer merges them into one bucket.
    let brick = || {
        Arc::new(
            Material::standard(StandardParams {
                color: 0xb22222,
                roughness: 0.8,
                metalness: 0.0,
                ..StandardParams::default()
            })
            .with_name("brick"),
        )
    };

    let geometry = house_geometry();
    let mut houses = SceneNode::new("houses");
    for row in 0..HOUSE_ROWS {
        for col in 0..HOUSE_COLS {
            let position = Vec3::new(
                col as f32 * HOUSE_SPACING,
                0.0,
                row as f32 * HOUSE_SPACING,
            );
            houses.add_child(
                SceneNode::new(format!("house_{row}_{col}"))
                    .with_transform(Mat4::new_translation(&position))
                    .with_drawable(Drawable::mesh(Arc::clone(&geometry), brick())),
            );
        }
    }
    town.add_child(houses);

    // Multi-material landmarks, split before optimization
    let stone = Arc::new(
        Material::standard(StandardParams {
            color: 0x888888,
            roughness: 0.9,
            ..StandardParams::default()
        })
        .with_name("stone"),
    );
    let copper = Arc::new(
        Material::physical(PhysicalParams {
            standard: StandardParams {
                color: 0x22cc99,
                roughness: 0.3,
                metalness: 1.0,
                ..StandardParams::default()
            },
            clearcoat: 0.5,
            ..PhysicalParams::default()
        })
        .with_name("copper_roof"),
    );
    town.add_child(
        SceneNode::new("town_hall")
            .with_transform(Mat4::new_translation(&Vec3::new(-20.0, 0.0, 0.0)))
            .with_drawable(Drawable::multi_mesh(
                landmark_geometry(),
                vec![Arc::clone(&stone), Arc::clone(&copper)],
            )),
    );

    // Street guides: line materials, never batched
    let chalk = Arc::new(
        Material::line(LineParams {
            color: 0xffffff,
            line_width: 1.0,
        })
        .with_name("chalk"),
    );
    for i in 0..STREET_COUNT {
        let position = Vec3::new(0.0, 0.01, i as f32 * HOUSE_SPACING * 2.0);
        town.add_child(
            SceneNode::new(format!("street_{i}"))
                .with_transform(Mat4::new_translation(&position))
                .with_drawable(Drawable::line(
                    street_geometry(HOUSE_COLS as f32 * HOUSE_SPACING),
                    Arc::clone(&chalk),
                )),
        );
    }

    town
}

fn main() {
    env_logger::init();

    let town = build_town();
    log::info!(
        "input scene: {} nodes, {} drawables",
        town.node_count(),
        town.drawable_count()
    );

    let mut optimizer = SceneOptimizer::with_default_config();

    let split = optimizer.split_multi_material_meshes(&town);
    log::info!("after splitting: {} drawables", split.drawable_count());

    let optimized = match optimizer.optimize(&split) {
        Ok(scene) => scene,
        Err(err) => {
            log::error!("optimization failed: {err}");
            std::process::exit(1);
        }
    };

    let stats = optimizer.stats();
    log::info!("optimized scene: {} draw-call units", optimized.children.len());
    log::info!(
        "  {} primitives over {} unique materials",
        stats.total_primitives,
        stats.unique_materials
    );
    log::info!(
        "  {} batches ({} packed instances), {} individual drawables, {} dropped",
        stats.batched_mesh_count,
        stats.batched_instance_count,
        stats.single_object_count,
        stats.dropped_primitive_count
    );

    for child in &optimized.children {
        if let Some(batch) = child.batch() {
            log::info!(
                "  batch '{}': {} instances, {}/{} vertices used",
                child.name,
                batch.instance_count(),
                batch.vertices_used(),
                batch.max_vertices()
            );
        }
    }
}
