//! Procedural proxy shapes
//!
//! All shapes are wound counter-clockwise seen from outside.

use std::collections::HashMap;
use std::f32::consts::PI;

use super::DisplayMesh;
use crate::rasterizer::{Face, Vec3, Vertex};

/// Unit icosphere centered at the origin.
///
/// Level 0 is the plain icosahedron; every level splits each triangle in
/// four. Vertex count is `10 * 4^level + 2`, face count `20 * 4^level`.
pub fn icosphere(level: u32) -> DisplayMesh {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;

    let mut positions: Vec<Vec3> = [
        (-1.0, t, 0.0), (1.0, t, 0.0), (-1.0, -t, 0.0), (1.0, -t, 0.0),
        (0.0, -1.0, t), (0.0, 1.0, t), (0.0, -1.0, -t), (0.0, 1.0, -t),
        (t, 0.0, -1.0), (t, 0.0, 1.0), (-t, 0.0, -1.0), (-t, 0.0, 1.0),
    ]
    .iter()
    .map(|&(x, y, z)| Vec3::new(x, y, z).normalize())
    .collect();

    let mut faces: Vec<[usize; 3]> = vec![
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    for _ in 0..level {
        // Edge (low, high) -> midpoint index, so shared edges split once
        let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();
        let mut midpoint = |a: usize, b: usize, positions: &mut Vec<Vec3>| -> usize {
            let key = (a.min(b), a.max(b));
            *midpoints.entry(key).or_insert_with(|| {
                positions.push(((positions[a] + positions[b]) * 0.5).normalize());
                positions.len() - 1
            })
        };

        let mut next = Vec::with_capacity(faces.len() * 4);
        for [a, b, c] in faces {
            let ab = midpoint(a, b, &mut positions);
            let bc = midpoint(b, c, &mut positions);
            let ca = midpoint(c, a, &mut positions);
            next.push([a, ab, ca]);
            next.push([b, bc, ab]);
            next.push([c, ca, bc]);
            next.push([ab, bc, ca]);
        }
        faces = next;
    }

    // On a unit sphere the normal is the position
    let vertices = positions.into_iter().map(|p| Vertex::new(p, p)).collect();
    let faces = faces.into_iter().map(|[a, b, c]| Face::new(a, b, c)).collect();
    DisplayMesh::from_parts(vertices, faces)
}

/// Cone along +Y: base ring of radius 1 at y = -0.5, apex at y = 0.5.
pub fn cone(sides: usize) -> DisplayMesh {
    let sides = sides.max(3);
    let mut mesh = DisplayMesh::new();

    let apex = mesh.add_vertex(Vec3::new(0.0, 0.5, 0.0));
    let base_center = mesh.add_vertex(Vec3::new(0.0, -0.5, 0.0));
    let ring_start = mesh.vertices().len();
    for i in 0..sides {
        let angle = (i as f32 / sides as f32) * 2.0 * PI;
        mesh.add_vertex(Vec3::new(angle.cos(), -0.5, angle.sin()));
    }

    for i in 0..sides {
        let current = ring_start + i;
        let next = ring_start + (i + 1) % sides;
        mesh.add_face(current, apex, next);
        mesh.add_face(base_center, current, next);
    }

    mesh
}
