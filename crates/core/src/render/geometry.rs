//! Static quad geometry: vertex data, indices, and their GL objects.
//!
//! The quad never changes after upload, so the buffers are STATIC_DRAW
//! and the vertex array captures the attribute layout once.

use bytemuck::{Pod, Zeroable};

use crate::error::ViewerError;

/// One quad vertex: clip-space position plus texture coordinates.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    /// Clip-space position; z is 0 for the flat quad.
    pub position: [f32; 3],
    /// Texture coordinates with the origin at the image's top-left.
    pub uv: [f32; 2],
}

/// The quad's four corners. The V axis flips relative to clip space
/// because image rows run top to bottom.
pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex {
        position: [1.0, 1.0, 0.0],
        uv: [1.0, 0.0],
    },
    QuadVertex {
        position: [1.0, -1.0, 0.0],
        uv: [1.0, 1.0],
    },
    QuadVertex {
        position: [-1.0, -1.0, 0.0],
        uv: [0.0, 1.0],
    },
    QuadVertex {
        position: [-1.0, 1.0, 0.0],
        uv: [0.0, 0.0],
    },
];

/// Two triangles covering the quad, sharing the 1-3 diagonal.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// The uploaded quad: vertex array, vertex buffer, and index buffer.
pub struct QuadGeometry {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: glow::Buffer,
}

impl QuadGeometry {
    /// Uploads the quad and records its attribute layout in a VAO.
    ///
    /// Attribute 0 is the vec3 position, attribute 1 the vec2 UV, both
    /// tightly interleaved in [`QuadVertex`] order.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Attachment`] if the driver refuses to
    /// create the vertex array or either buffer.
    #[allow(unsafe_code)]
    pub fn new(gl: &glow::Context) -> Result<Self, ViewerError> {
        use glow::HasContext;

        // SAFETY: glow wraps raw GL calls as unsafe. Handles created here
        // are deleted on every failure path, and the byte slices come from
        // Pod-derived constants.
        let vao = unsafe {
            gl.create_vertex_array()
                .map_err(ViewerError::Attachment)?
        };
        let vbo = match unsafe { gl.create_buffer() } {
            Ok(b) => b,
            Err(e) => {
                unsafe { gl.delete_vertex_array(vao) };
                return Err(ViewerError::Attachment(e));
            }
        };
        let ebo = match unsafe { gl.create_buffer() } {
            Ok(b) => b,
            Err(e) => {
                unsafe {
                    gl.delete_buffer(vbo);
                    gl.delete_vertex_array(vao);
                }
                return Err(ViewerError::Attachment(e));
            }
        };

        unsafe {
            gl.bind_vertex_array(Some(vao));

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&QUAD_VERTICES),
                glow::STATIC_DRAW,
            );

            // The element binding is captured by the VAO.
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&QUAD_INDICES),
                glow::STATIC_DRAW,
            );

            let stride = std::mem::size_of::<QuadVertex>() as i32;
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(
                1,
                2,
                glow::FLOAT,
                false,
                stride,
                (3 * std::mem::size_of::<f32>()) as i32,
            );

            // Unbind the VAO first so the buffer unbinds don't disturb it.
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
        }

        Ok(Self { vao, vbo, ebo })
    }

    /// Binds the vertex array for drawing.
    #[allow(unsafe_code)]
    pub fn bind(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: self.vao is a valid handle from new().
        unsafe { gl.bind_vertex_array(Some(self.vao)) };
    }

    /// Number of indices to draw.
    pub fn index_count(&self) -> i32 {
        QUAD_INDICES.len() as i32
    }

    /// Deletes the vertex array and both buffers.
    #[allow(unsafe_code)]
    pub fn destroy(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: all three handles are valid handles from new().
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
            gl.delete_buffer(self.ebo);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_has_four_vertices_and_six_indices() {
        assert_eq!(QUAD_VERTICES.len(), 4);
        assert_eq!(QUAD_INDICES.len(), 6);
    }

    #[test]
    fn indices_stay_in_vertex_range() {
        for &i in &QUAD_INDICES {
            assert!((i as usize) < QUAD_VERTICES.len(), "index {i} out of range");
        }
    }

    #[test]
    fn triangles_share_the_diagonal() {
        let first = &QUAD_INDICES[..3];
        let second = &QUAD_INDICES[3..];
        let shared: Vec<u32> = first
            .iter()
            .copied()
            .filter(|i| second.contains(i))
            .collect();
        assert_eq!(shared.len(), 2, "expected a shared edge, got {shared:?}");
    }

    #[test]
    fn positions_cover_all_four_clip_space_corners() {
        for (x, y) in [(1.0, 1.0), (1.0, -1.0), (-1.0, -1.0), (-1.0, 1.0)] {
            assert!(
                QUAD_VERTICES
                    .iter()
                    .any(|v| v.position[0] == x && v.position[1] == y),
                "missing corner ({x}, {y})"
            );
        }
    }

    #[test]
    fn uvs_cover_the_unit_square_with_flipped_v() {
        // The top-right clip-space corner samples the image's top-right,
        // which in top-left texture coordinates is (1, 0).
        let top_right = QUAD_VERTICES
            .iter()
            .find(|v| v.position[0] == 1.0 && v.position[1] == 1.0)
            .unwrap();
        assert_eq!(top_right.uv, [1.0, 0.0]);

        let bottom_left = QUAD_VERTICES
            .iter()
            .find(|v| v.position[0] == -1.0 && v.position[1] == -1.0)
            .unwrap();
        assert_eq!(bottom_left.uv, [0.0, 1.0]);
    }

    #[test]
    fn quad_sits_on_the_z_zero_plane() {
        for v in &QUAD_VERTICES {
            assert_eq!(v.position[2], 0.0);
        }
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        // 3 position floats + 2 uv floats, no padding.
        assert_eq!(std::mem::size_of::<QuadVertex>(), 20);
    }

    #[test]
    fn vertex_bytes_round_trip_through_bytemuck() {
        let bytes: &[u8] = bytemuck::cast_slice(&QUAD_VERTICES);
        assert_eq!(bytes.len(), 4 * std::mem::size_of::<QuadVertex>());
        let back: &[QuadVertex] = bytemuck::cast_slice(bytes);
        assert_eq!(back, &QUAD_VERTICES);
    }

    #[test]
    #[ignore = "requires GL context"]
    fn new_uploads_quad_buffers() {
        // Would test: QuadGeometry::new(gl) succeeds and index_count()
        // reports 6.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn destroy_releases_buffers() {
        // Would test: after destroy(), the VAO and buffers are deleted.
    }
}
