//! OpenGL rendering infrastructure.
//!
//! Everything here needs a live `glow::Context` except the GLSL sources,
//! the quad constants, and the validation helpers, which are plain data.
//!
//! # Module overview
//!
//! - [`shader`] -- Shader compilation, linking, and log annotation.
//! - [`program`] -- The quad program with its fixed sampler units.
//! - [`geometry`] -- Quad vertex/index data and buffer objects.
//! - [`texture`] -- Replaceable color and depth texture slots.
//! - [`rig`] -- The depth-exposure framebuffer rig.

pub mod geometry;
pub mod program;
pub mod rig;
pub mod shader;
pub mod texture;

// Re-export key types at the render module level for convenience.
pub use geometry::{QuadGeometry, QuadVertex, QUAD_INDICES, QUAD_VERTICES};
pub use program::{QuadProgram, QUAD_FRAGMENT_SHADER, QUAD_VERTEX_SHADER};
pub use rig::DepthExposureRig;
pub use shader::{annotate_info_log, compile_program, compile_shader, link_program};
pub use texture::{check_upload, TextureRole, TextureSlot};
