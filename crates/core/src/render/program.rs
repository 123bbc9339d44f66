//! The quad shader program: GLSL sources and sampler wiring.
//!
//! One program draws everything. The fragment stage samples the color
//! texture for output and re-authors `gl_FragDepth` from the depth
//! texture's red channel -- the quad itself is flat at clip-space z = 0,
//! so without the override the depth buffer would carry a constant.

use crate::error::ViewerError;
use crate::render::shader::compile_program;

/// GLSL 3.30 vertex shader: passes clip-space positions and UVs through.
pub const QUAD_VERTEX_SHADER: &str = r#"#version 330 core
layout (location = 0) in vec3 a_position;
layout (location = 1) in vec2 a_uv;
out vec2 v_uv;
void main() {
    gl_Position = vec4(a_position, 1.0);
    v_uv = a_uv;
}
"#;

/// GLSL 3.30 fragment shader: color from `uTexture`, fragment depth from
/// the red channel of `uDepthTexture`.
pub const QUAD_FRAGMENT_SHADER: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 out_color;
uniform sampler2D uTexture;
uniform sampler2D uDepthTexture;
void main() {
    out_color = texture(uTexture, v_uv);
    gl_FragDepth = texture(uDepthTexture, v_uv).r;
}
"#;

/// Texture unit the color sampler reads from.
pub const COLOR_UNIT: i32 = 0;

/// Texture unit the depth sampler reads from.
pub const DEPTH_UNIT: i32 = 1;

/// The compiled quad program with its samplers bound to fixed units.
pub struct QuadProgram {
    program: glow::Program,
    u_texture: Option<glow::UniformLocation>,
    u_depth_texture: Option<glow::UniformLocation>,
}

impl QuadProgram {
    /// Compiles and links the quad program, then points `uTexture` at
    /// unit 0 and `uDepthTexture` at unit 1.
    ///
    /// Uniform lookups stay `Option`: a driver that optimizes a sampler
    /// out yields `None`, and the assignment for it is skipped rather
    /// than treated as an error.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Compile`] or [`ViewerError::Link`] if the
    /// sources are rejected.
    #[allow(unsafe_code)]
    pub fn new(gl: &glow::Context) -> Result<Self, ViewerError> {
        use glow::HasContext;

        let program = compile_program(gl, QUAD_VERTEX_SHADER, QUAD_FRAGMENT_SHADER)?;

        // SAFETY: program is a valid handle from a successful link; glow
        // accepts None uniform locations as no-ops.
        let (u_texture, u_depth_texture) = unsafe {
            let u_texture = gl.get_uniform_location(program, "uTexture");
            let u_depth_texture = gl.get_uniform_location(program, "uDepthTexture");
            gl.use_program(Some(program));
            gl.uniform_1_i32(u_texture.as_ref(), COLOR_UNIT);
            gl.uniform_1_i32(u_depth_texture.as_ref(), DEPTH_UNIT);
            gl.use_program(None);
            (u_texture, u_depth_texture)
        };

        Ok(Self {
            program,
            u_texture,
            u_depth_texture,
        })
    }

    /// Makes this the active program.
    #[allow(unsafe_code)]
    pub fn bind(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: self.program is a valid handle from new().
        unsafe { gl.use_program(Some(self.program)) };
    }

    /// The underlying program handle.
    pub fn handle(&self) -> glow::Program {
        self.program
    }

    /// Deletes the program, releasing its GPU resources.
    #[allow(unsafe_code)]
    pub fn destroy(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: self.program is a valid handle from new().
        unsafe { gl.delete_program(self.program) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_shader_declares_position_and_uv_attributes() {
        assert!(
            QUAD_VERTEX_SHADER.contains("layout (location = 0) in vec3 a_position"),
            "expected position attribute in:\n{QUAD_VERTEX_SHADER}"
        );
        assert!(
            QUAD_VERTEX_SHADER.contains("layout (location = 1) in vec2 a_uv"),
            "expected uv attribute in:\n{QUAD_VERTEX_SHADER}"
        );
    }

    #[test]
    fn vertex_shader_targets_desktop_glsl() {
        assert!(
            QUAD_VERTEX_SHADER.contains("#version 330 core"),
            "expected GLSL 3.30 version directive in:\n{QUAD_VERTEX_SHADER}"
        );
        assert!(
            QUAD_FRAGMENT_SHADER.contains("#version 330 core"),
            "expected GLSL 3.30 version directive in:\n{QUAD_FRAGMENT_SHADER}"
        );
    }

    #[test]
    fn fragment_shader_declares_both_samplers() {
        assert!(
            QUAD_FRAGMENT_SHADER.contains("uniform sampler2D uTexture"),
            "expected color sampler in:\n{QUAD_FRAGMENT_SHADER}"
        );
        assert!(
            QUAD_FRAGMENT_SHADER.contains("uniform sampler2D uDepthTexture"),
            "expected depth sampler in:\n{QUAD_FRAGMENT_SHADER}"
        );
    }

    #[test]
    fn fragment_shader_authors_fragment_depth_from_red_channel() {
        assert!(
            QUAD_FRAGMENT_SHADER.contains("gl_FragDepth"),
            "expected gl_FragDepth write in:\n{QUAD_FRAGMENT_SHADER}"
        );
        assert!(
            QUAD_FRAGMENT_SHADER.contains("texture(uDepthTexture, v_uv).r"),
            "expected red-channel depth sample in:\n{QUAD_FRAGMENT_SHADER}"
        );
    }

    #[test]
    fn shaders_have_main_functions() {
        assert!(QUAD_VERTEX_SHADER.contains("void main()"));
        assert!(QUAD_FRAGMENT_SHADER.contains("void main()"));
    }

    #[test]
    fn sampler_units_are_distinct() {
        assert_ne!(COLOR_UNIT, DEPTH_UNIT);
    }

    #[test]
    fn quad_program_struct_has_expected_fields() {
        fn _assert_fields(p: &QuadProgram) {
            let _program = p.program;
            let _u_texture = &p.u_texture;
            let _u_depth_texture = &p.u_depth_texture;
        }
    }

    #[test]
    #[ignore = "requires GL context"]
    fn new_compiles_and_links_quad_program() {
        // Would test: QuadProgram::new(gl) succeeds against a 3.3 core
        // context and both uniform locations resolve to Some.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn samplers_bind_to_fixed_units() {
        // Would test: after new(), querying uTexture yields 0 and
        // uDepthTexture yields 1.
    }
}
