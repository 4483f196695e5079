use glam::Vec3;

use crate::heightfield::HeightField;
use crate::types::{HeightClassifier, LAYER_COUNT};

/// Parallel per-vertex attribute arrays for the triangulated surface, all of
/// length `6 * (size - 1)^2`. Positions are homogeneous; the renderer drops
/// the w component at the GPU boundary.
#[derive(Clone, Debug, Default)]
pub struct TerrainMeshData {
    pub positions: Vec<[f32; 4]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 4]>,
    pub texture_weights: Vec<[f32; LAYER_COUNT]>,
    pub tex_coords: Vec<[f32; 2]>,
}

impl TerrainMeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn with_capacity(vertices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            colors: Vec::with_capacity(vertices),
            texture_weights: Vec::with_capacity(vertices),
            tex_coords: Vec::with_capacity(vertices),
        }
    }
}

/// Triangulate the height grid: two triangles per quad, six vertices each
/// carrying position, face normal, flat color, texture-blend weight, and a
/// tiling texture coordinate.
pub fn build_terrain_mesh(field: &HeightField, classifier: &HeightClassifier) -> TerrainMeshData {
    let n = field.size();
    let mut mesh = TerrainMeshData::with_capacity(6 * (n - 1) * (n - 1));

    for i in 0..n - 1 {
        for j in 0..n - 1 {
            emit_quad(&mut mesh, field, classifier, i, j);
        }
    }

    mesh
}

fn emit_quad(
    mesh: &mut TerrainMeshData,
    field: &HeightField,
    classifier: &HeightClassifier,
    i: usize,
    j: usize,
) {
    let n = field.size() as f32;
    let corner = |ci: usize, cj: usize| -> [f32; 4] {
        [
            2.0 * ci as f32 / n - 1.0,
            field.get(ci, cj),
            2.0 * cj as f32 / n - 1.0,
            1.0,
        ]
    };

    // The whole quad classifies from its (i, j) corner height: flat-shaded
    // color and a single blend weight shared by all six vertices.
    let corner_height = field.get(i, j);
    let color = classifier.color_for(corner_height);
    let weight = classifier.texture_weight_for(corner_height);

    // Two triangles sharing the (i+1, j) - (i, j+1) diagonal, in the fixed
    // emission order the texture-coordinate roles are tied to.
    let vertices = [
        (corner(i + 1, j), [1.0, 1.0]),
        (corner(i, j), [0.0, 0.0]),
        (corner(i, j + 1), [0.0, 1.0]),
        (corner(i + 1, j), [1.0, 0.0]),
        (corner(i, j + 1), [0.0, 1.0]),
        (corner(i + 1, j + 1), [1.0, 1.0]),
    ];

    let base = mesh.positions.len();
    for (position, uv) in vertices {
        mesh.positions.push(position);
        mesh.tex_coords.push(uv);
        mesh.colors.push(color);
        mesh.texture_weights.push(weight);
    }

    let first = face_normal(
        mesh.positions[base],
        mesh.positions[base + 1],
        mesh.positions[base + 2],
    );

    // The second triangle's normal reads the freshly emitted positions
    // backwards from the end of the quad and negates the cross product.
    let second = -face_normal(
        mesh.positions[base + 5],
        mesh.positions[base + 4],
        mesh.positions[base + 3],
    );

    for _ in 0..3 {
        mesh.normals.push(first.to_array());
    }
    for _ in 0..3 {
        mesh.normals.push(second.to_array());
    }
}

/// Normal of the triangle (p0, p1, p2) in winding order; zero when the
/// triangle is degenerate.
fn face_normal(p0: [f32; 4], p1: [f32; 4], p2: [f32; 4]) -> Vec3 {
    let a = Vec3::new(p0[0], p0[1], p0[2]);
    let b = Vec3::new(p1[0], p1[1], p1[2]);
    let c = Vec3::new(p2[0], p2[1], p2[2]);
    (b - a).cross(c - a).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightfield::HeightField;

    fn flat_field(size: usize) -> HeightField {
        HeightField::from_heights(size, vec![0.0; size * size])
    }

    // 2x2 grid with one raised corner: get(0,0)=0, get(0,1)=0.3,
    // get(1,0)=0.06, get(1,1)=1.0.
    fn sloped_field() -> HeightField {
        HeightField::from_heights(2, vec![0.0, 0.3, 0.06, 1.0])
    }

    #[test]
    fn vertex_count_is_six_per_quad() {
        let classifier = HeightClassifier::default();
        for size in [2, 4, 8] {
            let field = HeightField::synthesize(size, 11).unwrap();
            let mesh = build_terrain_mesh(&field, &classifier);
            let expected = 6 * (size - 1) * (size - 1);
            assert_eq!(mesh.vertex_count(), expected);
            assert_eq!(mesh.positions.len(), expected);
            assert_eq!(mesh.normals.len(), expected);
            assert_eq!(mesh.colors.len(), expected);
            assert_eq!(mesh.texture_weights.len(), expected);
            assert_eq!(mesh.tex_coords.len(), expected);
        }
    }

    #[test]
    fn first_quad_positions_map_to_world() {
        let field = HeightField::synthesize(4, 5).unwrap();
        let mesh = build_terrain_mesh(&field, &HeightClassifier::default());

        // Vertex 0 of quad (0, 0) is the (1, 0) grid corner.
        let [x, y, z, w] = mesh.positions[0];
        assert_eq!(x, 2.0 * 1.0 / 4.0 - 1.0);
        assert_eq!(x, -0.5);
        assert_eq!(z, -1.0);
        assert_eq!(y, field.get(1, 0));
        assert_eq!(w, 1.0);

        // Vertex 1 is the quad's own (0, 0) corner.
        let [x, y, z, w] = mesh.positions[1];
        assert_eq!([x, z], [-1.0, -1.0]);
        assert_eq!(y, field.get(0, 0));
        assert_eq!(w, 1.0);
    }

    #[test]
    fn texture_coordinates_follow_vertex_roles() {
        let mesh = build_terrain_mesh(&sloped_field(), &HeightClassifier::default());
        let expected: [[f32; 2]; 6] = [
            [1.0, 1.0],
            [0.0, 0.0],
            [0.0, 1.0],
            [1.0, 0.0],
            [0.0, 1.0],
            [1.0, 1.0],
        ];
        assert_eq!(mesh.tex_coords, expected);
    }

    #[test]
    fn quad_attributes_are_flat_from_the_low_corner() {
        let classifier = HeightClassifier::default();
        let field = sloped_field();
        let mesh = build_terrain_mesh(&field, &classifier);

        // Every vertex of the quad samples the (0, 0) corner height even
        // though three of the corners sit in other bands.
        let color = classifier.color_for(field.get(0, 0));
        let weight = classifier.texture_weight_for(field.get(0, 0));
        for v in 0..6 {
            assert_eq!(mesh.colors[v], color, "vertex {v}");
            assert_eq!(mesh.texture_weights[v], weight, "vertex {v}");
        }
    }

    #[test]
    fn flat_terrain_normals_point_up() {
        let mesh = build_terrain_mesh(&flat_field(4), &HeightClassifier::default());
        for (v, normal) in mesh.normals.iter().enumerate() {
            assert_eq!(*normal, [0.0, 1.0, 0.0], "vertex {v}");
        }
    }

    #[test]
    fn non_degenerate_normals_have_unit_length() {
        let field = HeightField::synthesize(16, 21).unwrap();
        let mesh = build_terrain_mesh(&field, &HeightClassifier::default());
        for (v, normal) in mesh.normals.iter().enumerate() {
            let len_sq: f32 = normal.iter().map(|c| c * c).sum();
            assert!(
                (len_sq - 1.0).abs() < 1e-4,
                "vertex {v} normal {normal:?} has squared length {len_sq}"
            );
        }
    }

    #[test]
    fn normals_are_shared_per_triangle() {
        let field = HeightField::synthesize(8, 2).unwrap();
        let mesh = build_terrain_mesh(&field, &HeightClassifier::default());
        for base in (0..mesh.vertex_count()).step_by(6) {
            assert_eq!(mesh.normals[base], mesh.normals[base + 1]);
            assert_eq!(mesh.normals[base], mesh.normals[base + 2]);
            assert_eq!(mesh.normals[base + 3], mesh.normals[base + 4]);
            assert_eq!(mesh.normals[base + 3], mesh.normals[base + 5]);
        }
    }

    // Pins the second triangle's normal to the negated reversed-order cross
    // product over the emitted buffer, exactly as the original renderer
    // computed it.
    #[test]
    fn second_triangle_normal_uses_reversed_negated_buffer() {
        let mesh = build_terrain_mesh(&sloped_field(), &HeightClassifier::default());

        let expected = -face_normal(mesh.positions[5], mesh.positions[4], mesh.positions[3]);
        assert_eq!(mesh.normals[3], expected.to_array());

        // For a non-degenerate triangle this equals the triangle's own
        // emission-order normal, which is why the lighting looks right.
        let own = face_normal(mesh.positions[3], mesh.positions[4], mesh.positions[5]);
        let pinned = Vec3::from_array(mesh.normals[3]);
        assert!(pinned.distance(own) < 1e-5);
    }
}
