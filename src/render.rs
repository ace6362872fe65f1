//! GL rendering for bounceblur
//!
//! Compiles and links the edge blur program, resolves its uniforms, owns the
//! full-viewport quad, and draws one frame. Everything takes the raw `glow`
//! context smithay hands out through `with_context`, so it can run inside a
//! smithay frame.

use std::collections::HashMap;
use std::fmt;

use smithay::reexports::glow::{self, HasContext};
use thiserror::Error;

use crate::geometry::{Vec2, Viewport};
use crate::shader::{
    self, POSITION_ATTRIBUTE, UNIFORMS, UNIFORM_BLUR, UNIFORM_POS, UNIFORM_SIZE, VERTEX_SHADER,
};
use crate::sim::FrameParams;

/// Full-viewport quad in NDC, drawn as a triangle strip
pub const QUAD_VERTICES: [[f32; 2]; 4] = [[-1.0, 1.0], [1.0, 1.0], [-1.0, -1.0], [1.0, -1.0]];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_kind(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "VERTEX_SHADER"),
            ShaderStage::Fragment => write!(f, "FRAGMENT_SHADER"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("could not compile shader {stage}: {log}")]
    ShaderCompile {
        stage: ShaderStage,
        code: String,
        log: String,
    },

    #[error("linking program has failed: {log}")]
    ProgramLink { log: String },

    #[error("could not create GL {what}: {reason}")]
    ResourceCreate { what: &'static str, reason: String },

    #[error("program has no `{0}` attribute")]
    MissingAttribute(&'static str),
}

impl RenderError {
    /// Stage and source text of a shader the driver refused to compile
    pub fn rejected_source(&self) -> Option<(ShaderStage, &str)> {
        match self {
            RenderError::ShaderCompile { stage, code, .. } => Some((*stage, code.as_str())),
            _ => None,
        }
    }
}

/// Compile one shader stage. Nothing leaks on failure.
pub fn compile_shader(
    gl: &glow::Context,
    stage: ShaderStage,
    code: &str,
) -> Result<glow::Shader, RenderError> {
    unsafe {
        let shader = gl
            .create_shader(stage.gl_kind())
            .map_err(|reason| RenderError::ResourceCreate { what: "shader", reason })?;
        gl.shader_source(shader, code);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            tracing::error!("Could not compile shader {}: {}", stage, log);
            return Err(RenderError::ShaderCompile {
                stage,
                code: code.to_string(),
                log,
            });
        }

        Ok(shader)
    }
}

/// Link a vertex and a fragment stage. Consumes both shaders either way.
pub fn link_program(
    gl: &glow::Context,
    vertex: glow::Shader,
    fragment: glow::Shader,
) -> Result<glow::Program, RenderError> {
    unsafe {
        let program = match gl.create_program() {
            Ok(program) => program,
            Err(reason) => {
                gl.delete_shader(vertex);
                gl.delete_shader(fragment);
                return Err(RenderError::ResourceCreate { what: "program", reason });
            }
        };

        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        gl.link_program(program);

        gl.detach_shader(program, vertex);
        gl.detach_shader(program, fragment);
        gl.delete_shader(vertex);
        gl.delete_shader(fragment);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            tracing::error!("Linking program has failed: {}", log);
            return Err(RenderError::ProgramLink { log });
        }

        Ok(program)
    }
}

/// Look up uniform locations. Missing names are skipped, not fatal: GLSL
/// compilers drop unused uniforms and uploads to them are no-ops anyway.
pub fn bind_uniforms(
    gl: &glow::Context,
    program: glow::Program,
    names: &[&'static str],
) -> HashMap<&'static str, glow::UniformLocation> {
    let mut uniforms = HashMap::new();
    for &name in names {
        match unsafe { gl.get_uniform_location(program, name) } {
            Some(location) => {
                uniforms.insert(name, location);
            }
            None => tracing::warn!("Uniform `{}` not found in program", name),
        }
    }
    uniforms
}

/// Linked edge blur program plus the static quad it draws
pub struct EdgeBlurProgram {
    program: glow::Program,
    uniforms: HashMap<&'static str, glow::UniformLocation>,
    position: u32,
    quad: glow::Buffer,
    viewport: Viewport,
}

impl EdgeBlurProgram {
    /// Build the program and upload the constant rect size
    pub fn new(gl: &glow::Context, viewport: Viewport, rect_size: Vec2) -> Result<Self, RenderError> {
        let vertex = compile_shader(gl, ShaderStage::Vertex, VERTEX_SHADER)?;
        let fragment = match compile_shader(gl, ShaderStage::Fragment, &shader::fragment_shader()) {
            Ok(fragment) => fragment,
            Err(e) => {
                unsafe { gl.delete_shader(vertex) };
                return Err(e);
            }
        };
        let program = link_program(gl, vertex, fragment)?;

        let position = match unsafe { gl.get_attrib_location(program, POSITION_ATTRIBUTE) } {
            Some(position) => position,
            None => {
                unsafe { gl.delete_program(program) };
                return Err(RenderError::MissingAttribute(POSITION_ATTRIBUTE));
            }
        };
        let uniforms = bind_uniforms(gl, program, &UNIFORMS);

        let quad = unsafe {
            let quad = match gl.create_buffer() {
                Ok(quad) => quad,
                Err(reason) => {
                    gl.delete_program(program);
                    return Err(RenderError::ResourceCreate { what: "buffer", reason });
                }
            };
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(quad));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(QUAD_VERTICES.as_slice()),
                glow::STATIC_DRAW,
            );
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            quad
        };

        unsafe {
            gl.use_program(Some(program));
            gl.uniform_2_f32(uniforms.get(UNIFORM_SIZE), rect_size.x, rect_size.y);
            gl.use_program(None);
        }

        tracing::info!(
            "Edge blur program ready ({} of {} uniforms bound)",
            uniforms.len(),
            UNIFORMS.len()
        );

        Ok(Self {
            program,
            uniforms,
            position,
            quad,
            viewport,
        })
    }

    /// Draw the quad for one frame. Must be called with the program's
    /// context current, i.e. inside `with_context`.
    pub fn draw(&self, gl: &glow::Context, frame: &FrameParams) {
        let pos = self.viewport.to_gl_origin(frame.rect);

        unsafe {
            gl.viewport(0, 0, self.viewport.width as i32, self.viewport.height as i32);
            gl.disable(glow::SCISSOR_TEST);
            gl.disable(glow::BLEND);

            gl.use_program(Some(self.program));
            gl.uniform_2_f32(self.uniforms.get(UNIFORM_POS), pos.x, pos.y);
            gl.uniform_1_f32(self.uniforms.get(UNIFORM_BLUR), frame.blur);

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.quad));
            gl.enable_vertex_attrib_array(self.position);
            gl.vertex_attrib_pointer_f32(self.position, 2, glow::FLOAT, false, 0, 0);
            gl.draw_arrays(glow::TRIANGLE_STRIP, 0, QUAD_VERTICES.len() as i32);

            // Hand the context back the way smithay left it
            gl.disable_vertex_attrib_array(self.position);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.use_program(None);
            gl.enable(glow::BLEND);
        }
    }

    pub fn destroy(self, gl: &glow::Context) {
        unsafe {
            gl.delete_buffer(self.quad);
            gl.delete_program(self.program);
        }
    }
}
