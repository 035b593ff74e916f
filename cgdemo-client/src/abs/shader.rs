//! OpenGL Shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for managing OpenGL shaders.
//! This module also provides the [`Uniform`] trait for setting uniform variables in shader
//! programs.

use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3, Vec4};
use glow::HasContext;

/// Represents an individual OpenGL shader.
pub struct Shader {
    gl: Arc<glow::Context>,
    id: glow::Shader,
}

impl Shader {
    /// Compiles a new shader from the given source code. On failure the driver's info log
    /// is returned.
    pub fn new(gl: &Arc<glow::Context>, shader_type: u32, source: &str) -> Result<Self, String> {
        unsafe {
            let shader = gl.create_shader(shader_type)?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                let stage = match shader_type {
                    glow::VERTEX_SHADER => "vertex",
                    glow::FRAGMENT_SHADER => "fragment",
                    _ => "unknown",
                };
                return Err(format!("{} shader failed to compile: {}", stage, log));
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: shader,
            })
        }
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_shader(self.id);
        }
    }
}

/// Represents a uniform variable in a shader program.
pub trait Uniform {
    /// Sets the value of the uniform at `location` in the currently bound program.
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation);
}

macro_rules! uniform {
    ($ty:ty, |$gl:ident, $loc:ident, $v:ident| $body:expr) => {
        impl Uniform for $ty {
            fn set_uniform(&self, $gl: &glow::Context, $loc: &glow::UniformLocation) {
                let $v = self;
                unsafe { $body }
            }
        }
    };
}

uniform!(i32, |gl, loc, v| gl.uniform_1_i32(Some(loc), *v));
uniform!(f32, |gl, loc, v| gl.uniform_1_f32(Some(loc), *v));
uniform!(Vec2, |gl, loc, v| gl.uniform_2_f32(Some(loc), v.x, v.y));
uniform!(Vec3, |gl, loc, v| gl.uniform_3_f32(Some(loc), v.x, v.y, v.z));
uniform!(Vec4, |gl, loc, v| gl.uniform_4_f32(Some(loc), v.x, v.y, v.z, v.w));
uniform!(Mat4, |gl, loc, v| gl.uniform_matrix_4_f32_slice(
    Some(loc),
    false,
    &v.to_cols_array()
));

impl<T: Uniform> Uniform for &T {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        (*self).set_uniform(gl, location);
    }
}

/// Represents an OpenGL shader program composed of multiple shaders.
pub struct ShaderProgram {
    gl: Arc<glow::Context>,
    id: glow::Program,
}

impl ShaderProgram {
    /// Links a new shader program from the given shaders.
    pub fn new(gl: &Arc<glow::Context>, shaders: &[&Shader]) -> Result<Self, String> {
        unsafe {
            let program = gl.create_program()?;

            for shader in shaders {
                gl.attach_shader(program, shader.id);
            }

            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(format!("shader program failed to link: {}", log));
            }

            for shader in shaders {
                gl.detach_shader(program, shader.id);
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: program,
            })
        }
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        unsafe {
            self.gl.use_program(Some(self.id));
        }
    }

    /// Sets a uniform variable in the shader program. The program must be bound.
    /// Uniforms the driver optimised away are skipped.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        let location = unsafe { self.gl.get_uniform_location(self.id, name) };
        match location {
            Some(location) => value.set_uniform(&self.gl, &location),
            None => log::trace!("Uniform '{}' not found in program", name),
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.id);
        }
    }
}
