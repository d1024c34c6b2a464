//! Vertex, element, uniform and shader-storage buffers.
//!
//! All the buffer kinds share one implementation, `Buffer<K>`, and only differ in the
//! target they are bound to. Updating a buffer always replaces its whole data store.

pub mod attribute;

pub use self::attribute::VertexAttribute;

use std::marker::PhantomData;
use std::mem;
use std::os::raw::c_void;

use gl;
use gl::types::*;

use crate::backend::handle::{BufferObject, Handle};
use crate::backend::{self, BufferUsage, Capabilities};
use crate::errors::*;

pub trait BufferKind {
    const TARGET: GLenum;
    const NAME: &'static str;
    /// Indexed targets could be bound to a binding point with `Buffer::bind_base`.
    const INDEXED: bool = false;
    /// Restores the binding of the target to zero after update.
    const UNBIND_AFTER_UPDATE: bool = false;

    fn check(_: &Capabilities) -> Result<()> {
        Ok(())
    }
}

pub enum Vertex {}

impl BufferKind for Vertex {
    const TARGET: GLenum = gl::ARRAY_BUFFER;
    const NAME: &'static str = "VertexBuffer";
}

pub enum Element {}

impl BufferKind for Element {
    const TARGET: GLenum = gl::ELEMENT_ARRAY_BUFFER;
    const NAME: &'static str = "ElementBuffer";
    const UNBIND_AFTER_UPDATE: bool = true;
}

pub enum Uniform {}

impl BufferKind for Uniform {
    const TARGET: GLenum = gl::UNIFORM_BUFFER;
    const NAME: &'static str = "UniformBuffer";
    const INDEXED: bool = true;
}

pub enum ShaderStorage {}

impl BufferKind for ShaderStorage {
    const TARGET: GLenum = gl::SHADER_STORAGE_BUFFER;
    const NAME: &'static str = "ShaderStorageBuffer";
    const INDEXED: bool = true;

    fn check(caps: &Capabilities) -> Result<()> {
        if caps.supports_shader_storage_buffer() {
            Ok(())
        } else {
            Err(Error::Requirement("shader storage buffer objects".into()))
        }
    }
}

pub type VertexBuffer = Buffer<Vertex>;
pub type ElementBuffer = Buffer<Element>;
pub type UniformBuffer = Buffer<Uniform>;
pub type ShaderStorageBuffer = Buffer<ShaderStorage>;

pub struct Buffer<K: BufferKind> {
    handle: Handle<BufferObject>,
    _kind: PhantomData<K>,
}

impl<K: BufferKind> Buffer<K> {
    pub fn new() -> Result<Self> {
        K::check(&*backend::capabilities()?)?;

        Ok(Buffer {
            handle: Handle::new()?,
            _kind: PhantomData,
        })
    }

    /// Replaces the data store with `data`.
    pub fn update<T: Copy>(&self, data: &[T], usage: BufferUsage) -> Result<()> {
        let len = data.len() * mem::size_of::<T>();
        unsafe { self.update_raw(data.as_ptr() as *const c_void, len, usage) }
    }

    #[inline]
    pub fn update_bytes(&self, data: &[u8], usage: BufferUsage) -> Result<()> {
        self.update(data, usage)
    }

    /// Reallocates the data store with `len` uninitialized bytes.
    #[inline]
    pub fn allocate(&self, len: usize, usage: BufferUsage) -> Result<()> {
        unsafe { self.update_raw(::std::ptr::null(), len, usage) }
    }

    unsafe fn update_raw(&self, data: *const c_void, len: usize, usage: BufferUsage) -> Result<()> {
        if self.handle.is_empty() {
            return Err(Error::InvalidHandle);
        }

        gl::BindBuffer(K::TARGET, self.id());
        gl::BufferData(K::TARGET, len as GLsizeiptr, data, usage.into());

        if K::UNBIND_AFTER_UPDATE {
            gl::BindBuffer(K::TARGET, 0);
        }

        backend::check()
    }

    #[inline]
    pub fn bind(&self) {
        unsafe { gl::BindBuffer(K::TARGET, self.id()) };
    }

    #[inline]
    pub fn unbind(&self) {
        unsafe { gl::BindBuffer(K::TARGET, 0) };
    }

    /// Binds this buffer to the indexed binding point `index` of its target.
    pub fn bind_base(&self, index: u32) -> Result<()> {
        if !K::INDEXED {
            return Err(Error::InvalidTarget(format!("{} has no binding points", K::NAME)));
        }

        if self.handle.is_empty() {
            return Err(Error::InvalidHandle);
        }

        unsafe {
            gl::BindBufferBase(K::TARGET, index, self.id());
            backend::check()
        }
    }

    #[inline]
    pub fn destroy(&mut self) {
        self.handle.destroy();
    }

    #[inline]
    pub fn id(&self) -> GLuint {
        self.handle.id()
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.handle.is_empty()
    }
}

impl<K: BufferKind> Default for Buffer<K> {
    fn default() -> Self {
        Buffer {
            handle: Handle::empty(),
            _kind: PhantomData,
        }
    }
}

impl<K: BufferKind> ::std::fmt::Debug for Buffer<K> {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        write!(f, "{}({})", K::NAME, self.id())
    }
}
