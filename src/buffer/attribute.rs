use std::mem;
use std::slice;

use gl;
use gl::types::*;

use crate::backend::{self, BufferUsage, Capabilities, ScalarType};
use crate::errors::*;

use super::VertexBuffer;

/// Feeds one vertex attribute, either with a constant value shared by every vertex or with
/// one value per vertex stored in a owned `VertexBuffer`.
///
/// `T` is the host-side type of a single value, e.g. `f32` or `[f32; 3]`.
#[derive(Debug)]
pub struct VertexAttribute<T: Copy + Default> {
    vbo: VertexBuffer,
    uniform: bool,
    value: T,
    len: usize,
}

impl<T: Copy + Default> VertexAttribute<T> {
    pub fn new() -> Result<Self> {
        Ok(VertexAttribute {
            vbo: VertexBuffer::new()?,
            uniform: true,
            value: T::default(),
            len: 1,
        })
    }

    /// Uses `value` for every vertices.
    pub fn set_uniform_value(&mut self, value: T) {
        self.uniform = true;
        self.value = value;
    }

    /// Uploads one value per vertex.
    pub fn set_values(&mut self, values: &[T], usage: BufferUsage) -> Result<()> {
        self.vbo.update(values, usage)?;
        self.uniform = false;
        self.len = values.len();
        Ok(())
    }

    #[inline]
    pub fn is_uniform(&self) -> bool {
        self.uniform
    }

    /// Number of values uploaded with `set_values`.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Configures the attribute `index` of the bound vertex array. `size` is the number of
    /// components of `scalar` which makes up one `T`, and `valid_num` is the number of
    /// vertices that will be drawn.
    pub fn configure(
        &self,
        valid_num: usize,
        index: u32,
        size: usize,
        scalar: ScalarType,
        per_instance: bool,
    ) -> Result<()> {
        let caps = backend::capabilities()?;
        check_layout::<T>(&caps, size, scalar)?;

        unsafe {
            if self.uniform {
                gl::DisableVertexAttribArray(index);
                let components = slice::from_raw_parts(&self.value as *const T as *const u8, mem::size_of::<T>());
                set_constant(index, size, scalar, components);
            } else {
                if valid_num != self.len {
                    return Err(Error::SizeMismatch {
                        expected: valid_num,
                        actual: self.len,
                    });
                }

                self.vbo.bind();
                match scalar {
                    ScalarType::Double => {
                        gl::VertexAttribLPointer(index, size as GLint, gl::DOUBLE, 0, ::std::ptr::null())
                    }
                    v if v.is_integer() => {
                        gl::VertexAttribIPointer(index, size as GLint, v.into(), 0, ::std::ptr::null())
                    }
                    v => gl::VertexAttribPointer(
                        index,
                        size as GLint,
                        v.into(),
                        gl::FALSE,
                        0,
                        ::std::ptr::null(),
                    ),
                }

                gl::EnableVertexAttribArray(index);
                self.vbo.unbind();
            }

            if per_instance {
                gl::VertexAttribDivisor(index, 1);
            }

            backend::check()
        }
    }

    #[inline]
    pub fn buffer(&self) -> &VertexBuffer {
        &self.vbo
    }
}

/// Validates that `T` is made of exactly `size` components of `scalar`.
pub fn check_layout<T>(caps: &Capabilities, size: usize, scalar: ScalarType) -> Result<()> {
    match scalar {
        ScalarType::Float => {}
        ScalarType::Int | ScalarType::UInt if caps.supports_integer_vertex_attribs() => {}
        ScalarType::Double if caps.supports_double_vertex_attribs() => {}
        _ => {
            return Err(Error::Unsupported(format!(
                "vertex attribute of {:?} on {:?}",
                scalar, caps.version
            )));
        }
    }

    if size < 1 || size > 4 {
        return Err(Error::Unsupported(format!("vertex attribute with {} components", size)));
    }

    let expected = size * scalar.size();
    if mem::size_of::<T>() != expected {
        return Err(Error::SizeMismatch {
            expected,
            actual: mem::size_of::<T>(),
        });
    }

    Ok(())
}

/// Expands the first `size` components to four, missing components default to (0, 0, 0, 1).
pub fn pad_components<S: Copy>(values: &[S], size: usize, zero: S, one: S) -> [S; 4] {
    let mut padded = [zero, zero, zero, one];
    for (dst, src) in padded.iter_mut().zip(values.iter().take(size)) {
        *dst = *src;
    }
    padded
}

unsafe fn set_constant(index: u32, size: usize, scalar: ScalarType, bytes: &[u8]) {
    // Scalars are read unaligned from the bytes of `T`.
    unsafe fn read<S: Copy>(bytes: &[u8], size: usize) -> Vec<S> {
        (0..size)
            .map(|i| (bytes.as_ptr().add(i * mem::size_of::<S>()) as *const S).read_unaligned())
            .collect()
    }

    match scalar {
        ScalarType::Float => {
            let v = pad_components(&read::<f32>(bytes, size), size, 0.0, 1.0);
            gl::VertexAttrib4fv(index, v.as_ptr());
        }
        ScalarType::Int => {
            let v = pad_components(&read::<i32>(bytes, size), size, 0, 1);
            gl::VertexAttribI4iv(index, v.as_ptr());
        }
        ScalarType::UInt => {
            let v = pad_components(&read::<u32>(bytes, size), size, 0, 1);
            gl::VertexAttribI4uiv(index, v.as_ptr());
        }
        ScalarType::Double => {
            let v = pad_components(&read::<f64>(bytes, size), size, 0.0, 1.0);
            gl::VertexAttribL4dv(index, v.as_ptr());
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Extensions, Version};

    #[test]
    fn layout() {
        let caps = Capabilities::with_version(Version::GL(4, 1), Extensions::default());
        assert!(check_layout::<[f32; 3]>(&caps, 3, ScalarType::Float).is_ok());
        assert!(check_layout::<cgmath::Vector4<f32>>(&caps, 4, ScalarType::Float).is_ok());
        assert!(check_layout::<[u32; 2]>(&caps, 2, ScalarType::UInt).is_ok());
        assert!(check_layout::<f64>(&caps, 1, ScalarType::Double).is_ok());

        match check_layout::<[f32; 3]>(&caps, 4, ScalarType::Float) {
            Err(Error::SizeMismatch { expected, actual }) => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 12);
            }
            _ => panic!(),
        }

        assert!(check_layout::<[u8; 4]>(&caps, 4, ScalarType::UByte).is_err());
        assert!(check_layout::<[f32; 5]>(&caps, 5, ScalarType::Float).is_err());
    }

    #[test]
    fn layout_on_embedded() {
        let caps = Capabilities::with_version(Version::ES(3, 0), Extensions::default());
        assert!(check_layout::<i32>(&caps, 1, ScalarType::Int).is_ok());
        assert!(check_layout::<f64>(&caps, 1, ScalarType::Double).is_err());
    }

    #[test]
    fn padding() {
        assert_eq!(pad_components(&[2.0f32], 1, 0.0, 1.0), [2.0, 0.0, 0.0, 1.0]);
        assert_eq!(pad_components(&[1, 2, 3], 3, 0, 1), [1, 2, 3, 1]);
        assert_eq!(pad_components(&[1u32, 2, 3, 4], 4, 0, 1), [1, 2, 3, 4]);
    }
}
