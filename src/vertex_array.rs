use gl;
use gl::types::*;

use crate::backend::handle::{Handle, VertexArrayObject};
use crate::errors::*;

/// Records the vertex attribute configurations and the bound element buffer.
#[derive(Debug, Default)]
pub struct VertexArray {
    handle: Handle<VertexArrayObject>,
}

impl VertexArray {
    pub fn new() -> Result<Self> {
        Ok(VertexArray {
            handle: Handle::new()?,
        })
    }

    #[inline]
    pub fn bind(&self) {
        unsafe { gl::BindVertexArray(self.id()) };
    }

    #[inline]
    pub fn unbind(&self) {
        unsafe { gl::BindVertexArray(0) };
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
