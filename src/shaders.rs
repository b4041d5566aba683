//! GLSL shader sources and compilation helpers.
//!
//! All shaders target GLSL 3.30 core, matching the OpenGL 3.3 core-profile
//! context requested at startup.
//!
//! Compile and link *status* failures are deliberately non-fatal: the
//! driver's diagnostic text is logged and the handle is returned anyway.
//! Draw calls through a failed program are no-ops, and uniform lookups on it
//! degrade to `None`, which GL treats like the -1 location sentinel. Only
//! failure to create the underlying GL object at all is propagated as an
//! error.

use glow::HasContext;

/// Vertex shader shared by the fill and outline programs.
///
/// Applies the aspect-correction scale to the incoming position first, then
/// the accumulated scene transform.
///
/// # Uniforms
///
/// | Name        | Type   | Description                              |
/// |-------------|--------|------------------------------------------|
/// | `scale`     | `vec3` | Aspect correction `(height/width, 1, 1)` |
/// | `transform` | `mat4` | Accumulated scene translation            |
pub const VERTEX_SRC: &str = r"#version 330 core
layout (location = 0) in vec3 aPos;

uniform vec3 scale;
uniform mat4 transform;

void main() {
    gl_Position = transform * vec4(aPos * scale, 1.0);
}
";

/// Fragment shader for the filled figure (green).
pub const FILL_FRAGMENT_SRC: &str = r"#version 330 core
out vec4 FragColor;

void main() {
    FragColor = vec4(2.0 / 255.0, 153.0 / 255.0, 29.0 / 255.0, 1.0);
}
";

/// Fragment shader for the outline (black).
pub const OUTLINE_FRAGMENT_SRC: &str = r"#version 330 core
out vec4 FragColor;

void main() {
    FragColor = vec4(0.0, 0.0, 0.0, 1.0);
}
";

/// Compile a single shader stage (vertex or fragment) from source.
///
/// A failed compile is logged with the driver's info log and the stage is
/// returned regardless; linking it will fail the same soft way.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
///
/// # Errors
///
/// Returns an error only if the shader object itself cannot be created.
pub unsafe fn compile_shader(
    gl: &glow::Context,
    shader_type: u32,
    source: &str,
) -> Result<glow::Shader, String> {
    unsafe {
        let shader = gl.create_shader(shader_type)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let info = gl.get_shader_info_log(shader);
            log::error!("{} shader compilation failed: {info}", stage_name(shader_type));
        }

        Ok(shader)
    }
}

/// Link a program from two already-compiled stages.
///
/// The stages are attached, linked, and detached again; deleting them is the
/// caller's responsibility, so one vertex stage can serve several links. A
/// failed link is logged and the program is returned regardless.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
///
/// # Errors
///
/// Returns an error only if the program object itself cannot be created.
pub unsafe fn link_program(
    gl: &glow::Context,
    vertex: glow::Shader,
    fragment: glow::Shader,
) -> Result<glow::Program, String> {
    unsafe {
        let program = gl.create_program()?;
        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        gl.link_program(program);

        if !gl.get_program_link_status(program) {
            let info = gl.get_program_info_log(program);
            log::error!("program link failed: {info}");
        }

        gl.detach_shader(program, vertex);
        gl.detach_shader(program, fragment);

        Ok(program)
    }
}

fn stage_name(shader_type: u32) -> &'static str {
    match shader_type {
        glow::VERTEX_SHADER => "vertex",
        glow::FRAGMENT_SHADER => "fragment",
        _ => "unknown",
    }
}
