//! Shader programs.
//!
//! A `Shader` is built from GLSL sources or files. Sources without a `#version` directive
//! get one matching the current context. Programs built from files could be rebuilt
//! automatically whenever one of their files changes, see `Shader::enable_auto_reload`.

pub mod program;
pub mod source;
pub mod uniform;

pub use self::program::TextureUnits;
pub use self::source::{inject_version, ShaderPaths, ShaderSources, ShaderStage};
pub use self::uniform::UniformVariable;

use std::cell::RefCell;
use std::ffi::CString;
use std::rc::Rc;

use gl;
use gl::types::*;

use crate::backend::handle::{Handle, ProgramObject};
use crate::backend;
use crate::buffer::UniformBuffer;
use crate::errors::*;
use crate::reload::{self, AutoReload, Reload};
use crate::sched;
use crate::texture::Texture;

struct ShaderInner {
    uid: usize,
    program: Handle<ProgramObject>,
    units: TextureUnits,
    attributes: Vec<(String, u32)>,
    paths: ShaderPaths,
    auto_reload: Option<AutoReload>,
    callback: Option<Rc<dyn Fn()>>,
}

impl ShaderInner {
    fn new() -> Self {
        ShaderInner {
            uid: reload::next_uid(),
            program: Handle::empty(),
            units: TextureUnits::default(),
            attributes: Vec::new(),
            paths: ShaderPaths::default(),
            auto_reload: None,
            callback: None,
        }
    }

    fn is_created_from_files(&self) -> bool {
        self.paths.iter().next().is_some()
    }
}

impl Reload for ShaderInner {
    fn reload(&mut self) -> Result<()> {
        let caps = backend::capabilities()?;
        let sources = self.paths.read()?;
        let program = program::build(&sources, &self.attributes, &caps)?;

        info!("Reloaded shader {:?} from {:?}.", program, self.paths);
        self.program = program;
        self.units.clear();
        Ok(())
    }

    fn reloaded_callback(&self) -> Option<Rc<dyn Fn()>> {
        self.callback.clone()
    }
}

/// A linked shader program. `Shader` is bound to the thread which owns the GL context.
pub struct Shader {
    inner: Rc<RefCell<ShaderInner>>,
}

impl Default for Shader {
    fn default() -> Self {
        Shader {
            inner: Rc::new(RefCell::new(ShaderInner::new())),
        }
    }
}

impl Shader {
    pub fn from_sources(sources: &ShaderSources) -> Result<Shader> {
        let shader = Shader::default();
        shader.create_from_sources(sources)?;
        Ok(shader)
    }

    /// Builds a program from files, the paths are kept for `enable_auto_reload`.
    pub fn from_files(paths: &ShaderPaths) -> Result<Shader> {
        let shader = Shader::default();
        shader.create_from_files(paths)?;
        Ok(shader)
    }

    /// Rebuilds this shader in place. The previous program is destroyed first.
    pub fn create_from_sources(&self, sources: &ShaderSources) -> Result<()> {
        self.destroy();

        let caps = backend::capabilities()?;
        let mut inner = self.inner.borrow_mut();
        let program = program::build(sources, &inner.attributes, &caps)?;
        inner.program = program;
        Ok(())
    }

    pub fn create_from_files(&self, paths: &ShaderPaths) -> Result<()> {
        self.destroy();

        let caps = backend::capabilities()?;
        let sources = paths.read()?;

        let mut inner = self.inner.borrow_mut();
        let program = program::build(&sources, &inner.attributes, &caps)?;
        inner.program = program;
        inner.paths = paths.clone();
        Ok(())
    }

    /// Installs this program as part of current rendering state.
    pub fn use_program(&self) -> Result<()> {
        let inner = self.inner.borrow();
        if inner.program.is_empty() {
            return Err(Error::InvalidHandle);
        }

        unsafe {
            gl::UseProgram(inner.program.id());
            backend::check()
        }
    }

    #[inline]
    pub fn unuse(&self) {
        unsafe { gl::UseProgram(0) };
    }

    /// Sets the uniform `name` of this program, which must be in use. Returns `false` if
    /// there is no such active uniform.
    pub fn set_uniform(&self, name: &str, variable: UniformVariable) -> Result<bool> {
        let location = match self.uniform_location(name)? {
            Some(v) => v,
            None => return Ok(false),
        };

        unsafe {
            uniform::bind_uniform_variable(location, &variable);
            backend::check()?;
        }

        Ok(true)
    }

    #[inline]
    pub fn set_bool(&self, name: &str, v: bool) -> Result<bool> {
        self.set_uniform(name, v.into())
    }

    #[inline]
    pub fn set_int(&self, name: &str, v: i32) -> Result<bool> {
        self.set_uniform(name, v.into())
    }

    #[inline]
    pub fn set_float(&self, name: &str, v: f32) -> Result<bool> {
        self.set_uniform(name, v.into())
    }

    pub fn set_bool_array(&self, name: &str, v: &[bool]) -> Result<bool> {
        let v: Vec<i32> = v.iter().map(|&v| v as i32).collect();
        self.set_uniform(name, UniformVariable::I32Array(&v))
    }

    #[inline]
    pub fn set_int_array(&self, name: &str, v: &[i32]) -> Result<bool> {
        self.set_uniform(name, UniformVariable::I32Array(v))
    }

    #[inline]
    pub fn set_float_array(&self, name: &str, v: &[f32]) -> Result<bool> {
        self.set_uniform(name, UniformVariable::F32Array(v))
    }

    #[inline]
    pub fn set_vec2<V: Into<[f32; 2]>>(&self, name: &str, v: V) -> Result<bool> {
        self.set_uniform(name, UniformVariable::Vector2f(v.into()))
    }

    #[inline]
    pub fn set_vec3<V: Into<[f32; 3]>>(&self, name: &str, v: V) -> Result<bool> {
        self.set_uniform(name, UniformVariable::Vector3f(v.into()))
    }

    #[inline]
    pub fn set_vec4<V: Into<[f32; 4]>>(&self, name: &str, v: V) -> Result<bool> {
        self.set_uniform(name, UniformVariable::Vector4f(v.into()))
    }

    #[inline]
    pub fn set_vec2_array(&self, name: &str, v: &[[f32; 2]]) -> Result<bool> {
        self.set_uniform(name, UniformVariable::Vector2fArray(v))
    }

    #[inline]
    pub fn set_vec3_array(&self, name: &str, v: &[[f32; 3]]) -> Result<bool> {
        self.set_uniform(name, UniformVariable::Vector3fArray(v))
    }

    #[inline]
    pub fn set_vec4_array(&self, name: &str, v: &[[f32; 4]]) -> Result<bool> {
        self.set_uniform(name, UniformVariable::Vector4fArray(v))
    }

    #[inline]
    pub fn set_mat2<M: Into<[[f32; 2]; 2]>>(&self, name: &str, v: M) -> Result<bool> {
        self.set_uniform(name, UniformVariable::Matrix2f(v.into(), false))
    }

    #[inline]
    pub fn set_mat3<M: Into<[[f32; 3]; 3]>>(&self, name: &str, v: M) -> Result<bool> {
        self.set_uniform(name, UniformVariable::Matrix3f(v.into(), false))
    }

    #[inline]
    pub fn set_mat4<M: Into<[[f32; 4]; 4]>>(&self, name: &str, v: M) -> Result<bool> {
        self.set_uniform(name, UniformVariable::Matrix4f(v.into(), false))
    }

    /// Binds `texture` to the texture unit of sampler `name`.
    #[inline]
    pub fn set_texture(&self, name: &str, texture: &Texture) -> Result<bool> {
        self.set_texture_target(name, texture.target().into(), texture.id())
    }

    /// Binds the 2D texture `id` to the texture unit of sampler `name`.
    #[inline]
    pub fn set_texture_id(&self, name: &str, id: GLuint) -> Result<bool> {
        self.set_texture_target(name, gl::TEXTURE_2D, id)
    }

    fn set_texture_target(&self, name: &str, target: GLenum, id: GLuint) -> Result<bool> {
        let location = match self.uniform_location(name)? {
            Some(v) => v,
            None => return Ok(false),
        };

        let caps = backend::capabilities()?;
        let unit = self
            .inner
            .borrow_mut()
            .units
            .claim(name, caps.max_combined_texture_image_units)?;

        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            gl::BindTexture(target, id);
            gl::Uniform1i(location, unit as GLint);
            backend::check()?;
        }

        Ok(true)
    }

    /// The texture unit assigned to sampler `name` by `set_texture`.
    #[inline]
    pub fn texture_unit(&self, name: &str) -> Option<u32> {
        self.inner.borrow().units.get(name)
    }

    /// Connects the uniform block `name` to the indexed binding point `binding`, and binds
    /// `buffer` to it.
    pub fn set_uniform_block(&self, name: &str, buffer: &UniformBuffer, binding: u32) -> Result<bool> {
        let caps = backend::capabilities()?;
        if binding >= caps.max_indexed_uniform_buffer {
            return Err(Error::OutOfBounds);
        }

        let id = self.inner.borrow().program.id();
        if id == 0 {
            return Ok(false);
        }

        let c_str = cstring(name)?;
        unsafe {
            let index = gl::GetUniformBlockIndex(id, c_str.as_ptr());
            if index == gl::INVALID_INDEX {
                return Ok(false);
            }

            gl::UniformBlockBinding(id, index, binding);
            backend::check()?;
        }

        buffer.bind_base(binding)?;
        Ok(true)
    }

    /// Binds the vertex attribute `name` to `location`. Bindings take effect when the
    /// program is linked, so this should be called before `create_from_*`, and is kept
    /// across hot reloads.
    pub fn bind_attrib_location(&self, name: &str, location: u32) -> Result<()> {
        let c_str = cstring(name)?;

        let mut inner = self.inner.borrow_mut();
        inner.attributes.retain(|(v, _)| v != name);
        inner.attributes.push((name.to_owned(), location));

        if !inner.program.is_empty() {
            unsafe {
                gl::BindAttribLocation(inner.program.id(), location, c_str.as_ptr());
                backend::check()?;
            }
        }

        Ok(())
    }

    /// Returns the location of the active vertex attribute `name`.
    pub fn attrib_location(&self, name: &str) -> Option<u32> {
        let id = self.id();
        if id == 0 {
            return None;
        }

        let c_str = cstring(name).ok()?;
        let location = unsafe { gl::GetAttribLocation(id, c_str.as_ptr()) };
        if location < 0 {
            None
        } else {
            Some(location as u32)
        }
    }

    fn uniform_location(&self, name: &str) -> Result<Option<GLint>> {
        let id = self.id();
        if id == 0 {
            return Ok(None);
        }

        unsafe {
            let mut current = 0;
            gl::GetIntegerv(gl::CURRENT_PROGRAM, &mut current);
            if current as GLuint != id {
                return Err(Error::NotBound);
            }

            let c_str = cstring(name)?;
            let location = gl::GetUniformLocation(id, c_str.as_ptr());
            if location == -1 {
                Ok(None)
            } else {
                Ok(Some(location))
            }
        }
    }

    /// Watches the files this shader was built from, and rebuilds the program on the
    /// main-thread task queue whenever one of them changes. Failed rebuilds keep the
    /// current program.
    pub fn enable_auto_reload(&self, enable: bool) -> Result<()> {
        let mut inner = self.inner.borrow_mut();

        if !enable {
            inner.auto_reload = None;
            return Ok(());
        }

        if !backend::settings().hot_reload {
            warn!("Hot reload is disabled by settings, ignores {:?}.", inner.program);
            return Ok(());
        }

        if !inner.is_created_from_files() {
            warn!("Shader {:?} was not built from files, could not be reloaded.", inner.program);
            return Ok(());
        }

        let target: Rc<RefCell<dyn Reload>> = self.inner.clone();
        let mut auto_reload = AutoReload::new(inner.uid, Rc::downgrade(&target), sched::main_thread().clone());
        for (_, path) in inner.paths.iter() {
            auto_reload.watch(path)?;
        }

        inner.auto_reload = Some(auto_reload);
        Ok(())
    }

    #[inline]
    pub fn is_auto_reload_enabled(&self) -> bool {
        self.inner.borrow().auto_reload.is_some()
    }

    /// Sets the closure invoked after every successful hot reload.
    pub fn set_auto_reload_callback<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.inner.borrow_mut().callback = Some(Rc::new(callback));
    }

    /// Deletes the program, and forgets the files, watchers and callback.
    pub fn destroy(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.program.destroy();
        inner.units.clear();
        inner.paths = ShaderPaths::default();
        inner.auto_reload = None;
        inner.callback = None;
    }

    #[inline]
    pub fn id(&self) -> GLuint {
        self.inner.borrow().program.id()
    }

    /// Returns true if the driver recognizes this program.
    pub fn is_valid(&self) -> bool {
        let id = self.id();
        id != 0 && unsafe { gl::IsProgram(id) == gl::TRUE }
    }
}

impl ::std::fmt::Debug for Shader {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => write!(f, "Shader({:?}, {:?})", inner.program, inner.paths),
            Err(_) => write!(f, "Shader(<busy>)"),
        }
    }
}

fn cstring(name: &str) -> Result<CString> {
    CString::new(name.as_bytes()).map_err(|_| Error::InvalidFormat(format!("{:?} contains a nul character", name)))
}
