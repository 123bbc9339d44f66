//! Shader compilation and linking over glow.
//!
//! Vertex and fragment sources go in, a linked program comes out, and
//! failures surface the driver's diagnostics alongside numbered GLSL so
//! the reported line numbers can be read against the source. Compilation
//! and linking need a live `glow::Context`; the log annotation is pure
//! string work.

use crate::error::ViewerError;

/// Prefixes each source line with its right-aligned 1-based number and
/// appends the driver `log`, separated by a blank line.
///
/// Either argument may be empty; whatever is present is returned.
pub fn annotate_info_log(source: &str, log: &str) -> String {
    if source.is_empty() {
        return log.to_string();
    }

    let width = source.lines().count().to_string().len();
    let numbered = source
        .lines()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    if log.is_empty() {
        numbered
    } else {
        format!("{numbered}\n\n{log}")
    }
}

/// Compiles a single shader stage.
///
/// # Errors
///
/// Returns [`ViewerError::Compile`] with the annotated source and driver
/// log if the GLSL fails to compile.
#[allow(unsafe_code)]
pub fn compile_shader(
    gl: &glow::Context,
    shader_type: u32,
    source: &str,
) -> Result<glow::Shader, ViewerError> {
    use glow::HasContext;

    let stage = match shader_type {
        glow::VERTEX_SHADER => "vertex",
        glow::FRAGMENT_SHADER => "fragment",
        _ => "unknown",
    };

    // SAFETY: glow wraps raw GL calls as unsafe. shader_type is a valid
    // stage constant and the source is a valid string; the handle is
    // deleted on the failure path.
    let shader = unsafe {
        gl.create_shader(shader_type)
            .map_err(|e| ViewerError::Compile { stage, log: e })?
    };

    unsafe {
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
    }

    let compiled = unsafe { gl.get_shader_compile_status(shader) };

    if compiled {
        Ok(shader)
    } else {
        let info_log = unsafe { gl.get_shader_info_log(shader) };
        unsafe { gl.delete_shader(shader) };
        Err(ViewerError::Compile {
            stage,
            log: annotate_info_log(source, &info_log),
        })
    }
}

/// Links a vertex and fragment shader into a program.
///
/// Attaches both shaders, links, and detaches them afterward; the program
/// retains its own copies.
///
/// # Errors
///
/// Returns [`ViewerError::Link`] with the driver's info log if linking
/// fails.
#[allow(unsafe_code)]
pub fn link_program(
    gl: &glow::Context,
    vertex: glow::Shader,
    fragment: glow::Shader,
) -> Result<glow::Program, ViewerError> {
    use glow::HasContext;

    // SAFETY: both handles come from successful compile_shader calls; the
    // program is deleted on the failure path.
    let program = unsafe { gl.create_program().map_err(ViewerError::Link)? };

    unsafe {
        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        gl.link_program(program);

        // Detach regardless of link success -- the program owns copies.
        gl.detach_shader(program, vertex);
        gl.detach_shader(program, fragment);
    }

    let linked = unsafe { gl.get_program_link_status(program) };

    if linked {
        Ok(program)
    } else {
        let info_log = unsafe { gl.get_program_info_log(program) };
        unsafe { gl.delete_program(program) };
        Err(ViewerError::Link(info_log))
    }
}

/// Compiles both stages and links them into a program.
///
/// Shader handles are deleted after linking whether or not it succeeds.
///
/// # Errors
///
/// Returns [`ViewerError::Compile`] if either stage fails, or
/// [`ViewerError::Link`] if linking fails.
#[allow(unsafe_code)]
pub fn compile_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<glow::Program, ViewerError> {
    use glow::HasContext;

    let vert = compile_shader(gl, glow::VERTEX_SHADER, vertex_src)?;
    let frag = match compile_shader(gl, glow::FRAGMENT_SHADER, fragment_src) {
        Ok(f) => f,
        Err(e) => {
            // SAFETY: vert is a valid handle from a successful compile.
            unsafe { gl.delete_shader(vert) };
            return Err(e);
        }
    };

    let result = link_program(gl, vert, frag);

    // SAFETY: the linked program keeps its own copies of both stages, so
    // the standalone handles can go.
    unsafe {
        gl.delete_shader(vert);
        gl.delete_shader(frag);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotate_prepends_line_numbers() {
        let source = "#version 330 core\nvoid main() {\n}\n";
        let log = "ERROR: 0:2: syntax error";
        let annotated = annotate_info_log(source, log);

        assert!(
            annotated.contains("1: #version 330 core"),
            "expected numbered line 1, got:\n{annotated}"
        );
        assert!(
            annotated.contains("2: void main() {"),
            "expected numbered line 2, got:\n{annotated}"
        );
        assert!(
            annotated.contains(log),
            "expected driver log in output, got:\n{annotated}"
        );
    }

    #[test]
    fn annotate_handles_empty_source() {
        let annotated = annotate_info_log("", "some error");
        assert_eq!(annotated, "some error");
    }

    #[test]
    fn annotate_handles_empty_log() {
        let annotated = annotate_info_log("void main() {}", "");
        assert_eq!(annotated, "1: void main() {}");
    }

    #[test]
    fn annotate_handles_both_empty() {
        assert!(annotate_info_log("", "").is_empty());
    }

    #[test]
    fn annotate_right_aligns_numbers_past_ten_lines() {
        let source = (1..=12)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let annotated = annotate_info_log(&source, "err");
        let lines: Vec<&str> = annotated.lines().collect();

        assert!(
            lines[0].starts_with(" 1: "),
            "expected padded single digit, got: '{}'",
            lines[0]
        );
        assert!(
            lines[9].starts_with("10: "),
            "expected unpadded double digit, got: '{}'",
            lines[9]
        );
    }

    #[test]
    fn annotate_preserves_source_order() {
        let source = "line_a\nline_b\nline_c";
        let annotated = annotate_info_log(source, "err");
        let lines: Vec<&str> = annotated.lines().collect();
        assert!(lines[0].ends_with("line_a"));
        assert!(lines[1].ends_with("line_b"));
        assert!(lines[2].ends_with("line_c"));
    }
}
