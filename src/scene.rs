// scene.rs — static deck geometry: slide panels along +X, a floor, a marker cube

use glam::Vec3;

pub const SLIDE_SPACING: f32 = 10.0;
pub const SLIDE_COUNT: usize = 5;

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

#[derive(Debug, Clone, Default)]
pub struct SceneMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

// (normal, baked light factor) per face; no lighting pass.
const FACES: [(Vec3, f32); 6] = [
    (Vec3::X, 0.75),
    (Vec3::NEG_X, 0.65),
    (Vec3::Y, 1.0),
    (Vec3::NEG_Y, 0.4),
    (Vec3::Z, 0.9),
    (Vec3::NEG_Z, 0.55),
];

impl SceneMesh {
    /// Axis-aligned box, 4 vertices and 2 triangles per face, CCW from outside.
    pub fn push_box(&mut self, center: Vec3, half: Vec3, color: [f32; 3]) {
        for (n, light) in FACES {
            // Two axes spanning the face, ordered so u × v == n.
            let u = if n.x != 0.0 {
                Vec3::Y * n.x
            } else if n.y != 0.0 {
                Vec3::Z * n.y
            } else {
                Vec3::X * n.z
            };
            let v = n.cross(u);
            let c = center + n * half;
            let hu = u * half;
            let hv = v * half;

            let base = self.vertices.len() as u32;
            let shade = [color[0] * light, color[1] * light, color[2] * light];
            for corner in [c - hu - hv, c + hu - hv, c + hu + hv, c - hu + hv] {
                self.vertices.push(Vertex {
                    position: corner.to_array(),
                    color: shade,
                });
            }
            self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }
}

pub fn slide_center(index: usize) -> Vec3 {
    Vec3::new(index as f32 * SLIDE_SPACING, 0.7, 0.0)
}

pub fn build_deck() -> SceneMesh {
    let mut mesh = SceneMesh::default();

    let palette = [
        [0.86, 0.32, 0.28],
        [0.95, 0.72, 0.25],
        [0.35, 0.72, 0.45],
        [0.30, 0.55, 0.88],
        [0.62, 0.42, 0.85],
    ];
    for i in 0..SLIDE_COUNT {
        mesh.push_box(slide_center(i), Vec3::new(3.0, 1.75, 0.05), palette[i % palette.len()]);
    }

    let span = (SLIDE_COUNT as f32) * SLIDE_SPACING;
    mesh.push_box(
        Vec3::new(span / 2.0 - SLIDE_SPACING / 2.0, -2.05, -3.0),
        Vec3::new(span / 2.0 + 10.0, 0.05, 10.0),
        [0.21, 0.21, 0.25],
    );
    mesh.push_box(Vec3::new(5.0, -1.5, 0.0), Vec3::splat(0.5), [0.9, 0.9, 0.9]);

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_has_a_box_per_slide_plus_floor_and_cube() {
        let mesh = build_deck();
        let boxes = SLIDE_COUNT + 2;
        assert_eq!(mesh.vertices.len(), boxes * 24);
        assert_eq!(mesh.indices.len(), boxes * 36);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn box_faces_wind_outward() {
        let mut mesh = SceneMesh::default();
        mesh.push_box(Vec3::ZERO, Vec3::ONE, [1.0, 1.0, 1.0]);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]]
                .map(|i| Vec3::from_array(mesh.vertices[i as usize].position));
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn slides_are_spaced_along_x() {
        assert_eq!(slide_center(0).x, 0.0);
        assert_eq!(slide_center(3).x, 3.0 * SLIDE_SPACING);
    }
}
