//! Vertex formats and fixed geometry for the two demos.

use std::sync::Arc;

use cgdemo_core::obj::ObjVertex;
use glam::{Vec2, Vec3};
use glow::HasContext;

use crate::abs::{Mesh, Vertex};

/// A corner of the sprite quad, in sprite-local units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct SpriteVertex {
    pub position: Vec2,
    pub uv: Vec2,
}

impl Vertex for SpriteVertex {
    fn vertex_attribs(gl: &glow::Context) {
        unsafe {
            let stride = std::mem::size_of::<SpriteVertex>() as i32;

            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, stride, 0);

            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 2, glow::FLOAT, false, stride, size_of::<Vec2>() as i32);
        }
    }
}

impl Vertex for ObjVertex {
    fn vertex_attribs(gl: &glow::Context) {
        unsafe {
            let stride = std::mem::size_of::<ObjVertex>() as i32;

            // Position attribute
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);

            // Normal attribute
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, size_of::<Vec3>() as i32);

            // Texture coordinate attribute
            gl.enable_vertex_attrib_array(2);
            gl.vertex_attrib_pointer_f32(
                2,
                2,
                glow::FLOAT,
                false,
                stride,
                (2 * size_of::<Vec3>()) as i32,
            );
        }
    }
}

const QUAD_CORNERS: [Vec2; 4] = [
    Vec2::new(-0.5, -0.5),
    Vec2::new(0.5, -0.5),
    Vec2::new(0.5, 0.5),
    Vec2::new(-0.5, 0.5),
];

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Pairs the unit quad corners with the given texture coordinates, ordered bottom-left,
/// bottom-right, top-right, top-left.
pub fn quad_vertices(uv: [Vec2; 4]) -> [SpriteVertex; 4] {
    std::array::from_fn(|i| SpriteVertex {
        position: QUAD_CORNERS[i],
        uv: uv[i],
    })
}

/// The unit quad every sprite is drawn with. Its texture coordinates are rewritten
/// before each draw.
pub fn sprite_quad(gl: &Arc<glow::Context>) -> Result<Mesh, String> {
    let uv = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
    Mesh::new_dynamic(gl, &quad_vertices(uv), &QUAD_INDICES, glow::TRIANGLES)
}

fn corner(position: [f32; 3], normal: Vec3, uv: [f32; 2]) -> ObjVertex {
    ObjVertex {
        position: Vec3::from(position),
        normal,
        uv: Vec2::from(uv),
    }
}

/// The two side walls of the corridor, at `x = -1.5` and `x = 1.5`, running from
/// `z = -15` to `z = 5` and two units high.
pub fn wall_geometry() -> ([ObjVertex; 8], [u32; 12]) {
    let vertices = [
        corner([-1.5, 0.0, -15.0], Vec3::X, [0.0, 0.0]),
        corner([-1.5, 2.0, -15.0], Vec3::X, [0.0, 1.0]),
        corner([-1.5, 0.0, 5.0], Vec3::X, [1.0, 0.0]),
        corner([-1.5, 2.0, 5.0], Vec3::X, [1.0, 1.0]),
        corner([1.5, 0.0, -15.0], Vec3::NEG_X, [0.0, 0.0]),
        corner([1.5, 2.0, -15.0], Vec3::NEG_X, [0.0, 1.0]),
        corner([1.5, 0.0, 5.0], Vec3::NEG_X, [1.0, 0.0]),
        corner([1.5, 2.0, 5.0], Vec3::NEG_X, [1.0, 1.0]),
    ];
    let indices = [0, 1, 2, 1, 3, 2, 4, 5, 6, 5, 7, 6];
    (vertices, indices)
}

/// The corridor floor at `y = 0`, between the walls.
pub fn floor_geometry() -> ([ObjVertex; 4], [u32; 6]) {
    let vertices = [
        corner([-1.5, 0.0, -15.0], Vec3::Y, [0.0, 0.0]),
        corner([1.5, 0.0, -15.0], Vec3::Y, [1.0, 0.0]),
        corner([-1.5, 0.0, 5.0], Vec3::Y, [0.0, 1.0]),
        corner([1.5, 0.0, 5.0], Vec3::Y, [1.0, 1.0]),
    ];
    let indices = [0, 1, 2, 1, 3, 2];
    (vertices, indices)
}

/// Uploads the walls and the floor as two static meshes.
pub fn corridor_meshes(gl: &Arc<glow::Context>) -> Result<(Mesh, Mesh), String> {
    let (wall_vertices, wall_indices) = wall_geometry();
    let (floor_vertices, floor_indices) = floor_geometry();
    let walls = Mesh::new(gl, &wall_vertices, &wall_indices, glow::TRIANGLES)?;
    let floor = Mesh::new(gl, &floor_vertices, &floor_indices, glow::TRIANGLES)?;
    Ok((walls, floor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layouts_are_tightly_packed() {
        assert_eq!(std::mem::size_of::<SpriteVertex>(), 16);
        assert_eq!(std::mem::size_of::<ObjVertex>(), 32);
    }

    #[test]
    fn quad_vertices_keep_corner_order() {
        let uv = [
            Vec2::new(0.2, 0.6),
            Vec2::new(0.4, 0.6),
            Vec2::new(0.4, 0.8),
            Vec2::new(0.2, 0.8),
        ];
        let vertices = quad_vertices(uv);
        assert_eq!(vertices[0].position, Vec2::new(-0.5, -0.5));
        assert_eq!(vertices[2].position, Vec2::new(0.5, 0.5));
        for (vertex, expected) in vertices.iter().zip(uv) {
            assert_eq!(vertex.uv, expected);
        }
    }

    #[test]
    fn quad_indices_cover_both_triangles() {
        let mut used = QUAD_INDICES.to_vec();
        used.sort_unstable();
        used.dedup();
        assert_eq!(used, vec![0, 1, 2, 3]);
    }

    #[test]
    fn walls_face_into_the_corridor() {
        let (vertices, indices) = wall_geometry();
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
        for vertex in &vertices {
            // Each wall normal points towards x = 0.
            assert!(vertex.normal.x * vertex.position.x < 0.0);
            assert!((0.0..=2.0).contains(&vertex.position.y));
        }
    }

    #[test]
    fn floor_is_flat_and_faces_up() {
        let (vertices, indices) = floor_geometry();
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
        assert!(vertices.iter().all(|v| v.position.y == 0.0 && v.normal == Vec3::Y));
    }
}
