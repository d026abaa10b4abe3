#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
//! Demo meshing a synthetic depth image with dropouts.
//!
//! A simulated 64x48 depth camera looks at a box standing on a floor. The
//! box edge is a depth discontinuity, and a few small blobs of pixels are
//! missing as if the sensor saw specular spots. The demo meshes the image,
//! cuts the discontinuity, closes the small holes and prints a summary.
//!
//! Run with `RUST_LOG=debug` to see the generator's own log lines.

use orgmesh::{
    GeneratorOptions, OrganizedFastMeshGenerator, OrganizedGrid, Sample, TriangleMesh, Vec3,
};

const WIDTH: usize = 64;
const HEIGHT: usize = 48;
/// Pixel footprint on the floor, in metres.
const PIXEL: f32 = 0.01;

/// Dropout blobs as (center x, center y, radius) in pixels.
const DROPOUTS: [(f32, f32, f32); 3] = [(12.0, 10.0, 1.5), (40.0, 30.0, 2.2), (50.0, 8.0, 1.0)];

fn depth_at(x: usize, y: usize) -> f32 {
    let on_box = (24..44).contains(&x) && (16..36).contains(&y);
    if on_box {
        0.6
    } else {
        1.0
    }
}

fn is_dropout(x: usize, y: usize) -> bool {
    DROPOUTS.iter().any(|&(cx, cy, r)| {
        let (dx, dy) = (x as f32 - cx, y as f32 - cy);
        dx * dx + dy * dy <= r * r
    })
}

fn main() {
    env_logger::init();

    let grid = OrganizedGrid::from_fn(WIDTH, HEIGHT, |x, y| {
        if is_dropout(x, y) {
            return Sample::missing();
        }
        let z = depth_at(x, y);
        // Back-project with a pinhole whose focal length keeps the floor at PIXEL spacing.
        let u = (x as f32 - WIDTH as f32 / 2.0) * PIXEL;
        let v = (y as f32 - HEIGHT as f32 / 2.0) * PIXEL;
        Sample::new(Vec3::new(u * z, v * z, z), Vec3::NEG_Z).with_color(if z < 1.0 {
            [200, 120, 40]
        } else {
            [90, 90, 90]
        })
    })
    .expect("grid dimensions match the sample count");

    let options = GeneratorOptions::new()
        .with_edge_threshold(0.05)
        .with_max_fill_contour_len(24);
    println!("options:\n{}", options.to_json().expect("options serialize"));

    let mut generator = OrganizedFastMeshGenerator::with_options(&grid, options);
    let mut mesh = TriangleMesh::new();

    let stats = generator.generate_mesh(&mut mesh);
    println!(
        "grid {}x{}: {} valid samples, {} triangles, {} cut at depth discontinuities",
        WIDTH, HEIGHT, stats.vertices, stats.triangles, stats.rejected_long_edges
    );
    println!("boundary edges before filling: {}", mesh.boundary_edges().len());

    for contour in generator.hole_contours() {
        log::info!("hole contour: {} cells", contour.len());
    }

    let fill = generator.fill_holes(&mut mesh).expect("mesh was generated");
    println!(
        "holes: {} found, {} filled with {} triangles, {} left open",
        fill.holes, fill.filled, fill.triangles, fill.skipped
    );
    println!("boundary edges after filling: {}", mesh.boundary_edges().len());
    println!(
        "final mesh: {} vertices, {} triangles",
        mesh.vertices.len(),
        mesh.num_triangles()
    );
}
