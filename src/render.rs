//! The renderer: owns all GL objects and issues the two per-frame draw
//! calls (filled figure, then outline).

use std::sync::Arc;

use glow::HasContext;

use crate::geometry::{FigureMesh, Vertex};
use crate::shaders;

/// Background color the framebuffer is cleared to each frame.
const CLEAR_COLOR: [f32; 4] = [228.0 / 255.0, 233.0 / 255.0, 69.0 / 255.0, 1.0];

/// Convert a `u32` to `i32` for GL API calls.
///
/// # Panics
///
/// Panics if `value > i32::MAX`. In practice, this is unreachable for
/// normal window dimensions.
fn gl_size(value: u32) -> i32 {
    i32::try_from(value).expect("dimension exceeds i32::MAX")
}

/// Full-window viewport rectangle for a drawable of the given size.
fn viewport_rect(width: u32, height: u32) -> [i32; 4] {
    [0, 0, gl_size(width), gl_size(height)]
}

/// Cached uniform locations for one program.
///
/// A location is `None` when the shader failed to compile or link (or the
/// linker dropped the uniform); pushing through a `None` location is a
/// silent no-op, matching GL's -1 sentinel.
struct SceneUniforms {
    /// Location of the vec3 `scale` uniform.
    scale: Option<glow::UniformLocation>,
    /// Location of the mat4 `transform` uniform.
    transform: Option<glow::UniformLocation>,
}

impl SceneUniforms {
    /// Look up the scene uniform locations once, right after linking.
    unsafe fn locate(gl: &glow::Context, program: glow::Program) -> Self {
        unsafe {
            Self {
                scale: gl.get_uniform_location(program, "scale"),
                transform: gl.get_uniform_location(program, "transform"),
            }
        }
    }
}

/// One of the two draw passes over the shared vertex data.
struct DrawVariant {
    /// Linked program for this pass.
    program: glow::Program,
    /// Cached uniform locations for [`program`](Self::program).
    uniforms: SceneUniforms,
    /// Vertex array holding this variant's buffer bindings and layout.
    vao: glow::VertexArray,
    /// Vertex buffer (the shared positions, uploaded per variant).
    vbo: glow::Buffer,
    /// Element buffer with this variant's index sequence.
    ebo: glow::Buffer,
    /// Primitive mode (`TRIANGLES` for fill, `LINE_STRIP` for outline).
    mode: u32,
    /// Number of indices to draw.
    index_count: i32,
}

/// Renderer for the figure scene.
///
/// Owns two shader programs (sharing one vertex stage), two vertex-array
/// configurations over the same vertex data, and the index buffer of each
/// variant. All GL objects are created once in [`new`](Self::new) and
/// released once by [`destroy`](Self::destroy).
///
/// # Safety
///
/// All methods issue raw GL calls and require the context passed to
/// [`new`](Self::new) to be current on the calling thread.
pub struct FigureRenderer {
    /// The OpenGL context, shared via [`Arc`] with the window bootstrap.
    gl: Arc<glow::Context>,
    /// Filled-triangle pass, drawn first.
    fill: DrawVariant,
    /// Line-strip outline pass, drawn on top.
    outline: DrawVariant,
}

impl FigureRenderer {
    /// Create the renderer: compile and link both programs, then upload the
    /// mesh into both vertex-array configurations.
    ///
    /// The vertex stage is compiled once and deleted only after *both*
    /// programs are linked; linking copies the stage into the program, so
    /// the shader objects are free to go afterwards.
    ///
    /// # Safety
    ///
    /// The `gl` context must be current and valid. The caller must ensure
    /// that [`destroy`](Self::destroy) is called before the context is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns an error string if a GL shader, program, buffer, or vertex
    /// array object cannot be created. Compile and link diagnostics are
    /// logged, not returned (see [`crate::shaders`]).
    pub unsafe fn new(gl: Arc<glow::Context>, mesh: &FigureMesh) -> Result<Self, String> {
        let (fill_program, outline_program) = unsafe {
            let vertex = shaders::compile_shader(&gl, glow::VERTEX_SHADER, shaders::VERTEX_SRC)?;
            let fill_fragment =
                shaders::compile_shader(&gl, glow::FRAGMENT_SHADER, shaders::FILL_FRAGMENT_SRC)?;
            let outline_fragment = shaders::compile_shader(
                &gl,
                glow::FRAGMENT_SHADER,
                shaders::OUTLINE_FRAGMENT_SRC,
            )?;

            let fill_program = shaders::link_program(&gl, vertex, fill_fragment)?;
            let outline_program = shaders::link_program(&gl, vertex, outline_fragment)?;

            // Both links are done; the stage objects have served their purpose.
            gl.delete_shader(vertex);
            gl.delete_shader(fill_fragment);
            gl.delete_shader(outline_fragment);

            (fill_program, outline_program)
        };

        let fill = unsafe {
            Self::build_variant(
                &gl,
                fill_program,
                mesh.vertices(),
                mesh.fill_indices(),
                glow::TRIANGLES,
            )?
        };
        let outline = unsafe {
            Self::build_variant(
                &gl,
                outline_program,
                mesh.vertices(),
                mesh.outline_indices(),
                glow::LINE_STRIP,
            )?
        };

        Ok(Self { gl, fill, outline })
    }

    /// Set up one variant: VAO, vertex upload, index upload, and the single
    /// position attribute (3 tightly-packed floats at slot 0).
    ///
    /// # Panics
    ///
    /// Panics if the index count exceeds `i32::MAX`.
    unsafe fn build_variant(
        gl: &glow::Context,
        program: glow::Program,
        vertices: &[Vertex],
        indices: &[u32],
        mode: u32,
    ) -> Result<DrawVariant, String> {
        let uniforms = unsafe { SceneUniforms::locate(gl, program) };

        let (vao, vbo, ebo) = unsafe {
            let vao = gl.create_vertex_array()?;
            let vbo = gl.create_buffer()?;
            let ebo = gl.create_buffer()?;

            gl.bind_vertex_array(Some(vao));

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::STATIC_DRAW,
            );

            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(indices),
                glow::STATIC_DRAW,
            );

            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(
                0,
                3,
                glow::FLOAT,
                false,
                // Vertex is 12 bytes, well within i32 range.
                #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                {
                    std::mem::size_of::<Vertex>() as i32
                },
                0,
            );

            gl.bind_vertex_array(None);

            (vao, vbo, ebo)
        };

        let index_count = i32::try_from(indices.len()).expect("index count exceeds i32::MAX");

        Ok(DrawVariant {
            program,
            uniforms,
            vao,
            vbo,
            ebo,
            mode,
            index_count,
        })
    }

    /// Point the viewport at the full drawable, `(0, 0, width, height)`.
    ///
    /// Called once after context creation and again on every resize.
    ///
    /// # Safety
    ///
    /// Requires a current GL context matching the one passed to
    /// [`new`](Self::new).
    pub unsafe fn set_viewport(&self, width: u32, height: u32) {
        let [x, y, w, h] = viewport_rect(width, height);
        unsafe { self.gl.viewport(x, y, w, h) };
    }

    /// Render one frame into the currently-bound (default) framebuffer.
    ///
    /// Clears to the background color, then draws the fill and outline
    /// variants with the given `scale` and column-major `transform`
    /// uniforms. Uniforms are pushed before each draw call so the frame
    /// being drawn always sees the values computed for it.
    ///
    /// # Safety
    ///
    /// Requires a current GL context matching the one passed to
    /// [`new`](Self::new).
    pub unsafe fn draw(&self, scale: [f32; 3], transform: &[f32; 16]) {
        let gl = &self.gl;

        unsafe {
            gl.clear_color(
                CLEAR_COLOR[0],
                CLEAR_COLOR[1],
                CLEAR_COLOR[2],
                CLEAR_COLOR[3],
            );
            gl.clear(glow::COLOR_BUFFER_BIT);

            self.draw_variant(&self.fill, scale, transform);
            self.draw_variant(&self.outline, scale, transform);

            gl.bind_vertex_array(None);
        }
    }

    /// Issue one variant's indexed draw call.
    unsafe fn draw_variant(&self, variant: &DrawVariant, scale: [f32; 3], transform: &[f32; 16]) {
        let gl = &self.gl;

        unsafe {
            gl.use_program(Some(variant.program));
            gl.bind_vertex_array(Some(variant.vao));

            gl.uniform_3_f32(
                variant.uniforms.scale.as_ref(),
                scale[0],
                scale[1],
                scale[2],
            );
            gl.uniform_matrix_4_f32_slice(
                variant.uniforms.transform.as_ref(),
                false,
                transform,
            );

            gl.draw_elements(variant.mode, variant.index_count, glow::UNSIGNED_INT, 0);
        }
    }

    /// Clean up all GL objects owned by this renderer.
    ///
    /// Release order is fixed: each variant's vertex array, vertex buffer,
    /// and index buffer, then both programs.
    ///
    /// # Safety
    ///
    /// Must be called with the same GL context that was used to create the
    /// renderer, and must be called exactly once.
    pub unsafe fn destroy(&self) {
        let gl = &self.gl;
        unsafe {
            for variant in [&self.fill, &self.outline] {
                gl.delete_vertex_array(variant.vao);
                gl.delete_buffer(variant.vbo);
                gl.delete_buffer(variant.ebo);
            }
            gl.delete_program(self.fill.program);
            gl.delete_program(self.outline.program);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_covers_the_full_drawable() {
        assert_eq!(viewport_rect(800, 600), [0, 0, 800, 600]);
        assert_eq!(viewport_rect(400, 800), [0, 0, 400, 800]);
    }

    #[test]
    fn viewport_handles_zero_dimensions() {
        assert_eq!(viewport_rect(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn clear_color_components_are_unit_range() {
        assert!(CLEAR_COLOR.iter().all(|c| (0.0..=1.0).contains(c)));
    }
}
