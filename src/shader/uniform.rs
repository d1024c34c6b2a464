use gl;
use gl::types::*;

use cgmath::{Matrix2, Matrix3, Matrix4, Vector2, Vector3, Vector4};

/// Uniform variable of a program object. Matrices are supplied in column major order, with
/// a optional transpose.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformVariable<'a> {
    I32(i32),
    F32(f32),
    Vector2f([f32; 2]),
    Vector3f([f32; 3]),
    Vector4f([f32; 4]),
    Matrix2f([[f32; 2]; 2], bool),
    Matrix3f([[f32; 3]; 3], bool),
    Matrix4f([[f32; 4]; 4], bool),
    I32Array(&'a [i32]),
    F32Array(&'a [f32]),
    Vector2fArray(&'a [[f32; 2]]),
    Vector3fArray(&'a [[f32; 3]]),
    Vector4fArray(&'a [[f32; 4]]),
}

impl<'a> From<bool> for UniformVariable<'a> {
    fn from(v: bool) -> Self {
        UniformVariable::I32(v as i32)
    }
}

impl<'a> From<i32> for UniformVariable<'a> {
    fn from(v: i32) -> Self {
        UniformVariable::I32(v)
    }
}

impl<'a> From<f32> for UniformVariable<'a> {
    fn from(v: f32) -> Self {
        UniformVariable::F32(v)
    }
}

impl<'a> From<[f32; 2]> for UniformVariable<'a> {
    fn from(v: [f32; 2]) -> Self {
        UniformVariable::Vector2f(v)
    }
}

impl<'a> From<Vector2<f32>> for UniformVariable<'a> {
    fn from(v: Vector2<f32>) -> Self {
        UniformVariable::Vector2f(v.into())
    }
}

impl<'a> From<[f32; 3]> for UniformVariable<'a> {
    fn from(v: [f32; 3]) -> Self {
        UniformVariable::Vector3f(v)
    }
}

impl<'a> From<Vector3<f32>> for UniformVariable<'a> {
    fn from(v: Vector3<f32>) -> Self {
        UniformVariable::Vector3f(v.into())
    }
}

impl<'a> From<[f32; 4]> for UniformVariable<'a> {
    fn from(v: [f32; 4]) -> Self {
        UniformVariable::Vector4f(v)
    }
}

impl<'a> From<Vector4<f32>> for UniformVariable<'a> {
    fn from(v: Vector4<f32>) -> Self {
        UniformVariable::Vector4f(v.into())
    }
}

impl<'a> From<Matrix2<f32>> for UniformVariable<'a> {
    fn from(v: Matrix2<f32>) -> Self {
        UniformVariable::Matrix2f(v.into(), false)
    }
}

impl<'a> From<Matrix3<f32>> for UniformVariable<'a> {
    fn from(v: Matrix3<f32>) -> Self {
        UniformVariable::Matrix3f(v.into(), false)
    }
}

impl<'a> From<Matrix4<f32>> for UniformVariable<'a> {
    fn from(v: Matrix4<f32>) -> Self {
        UniformVariable::Matrix4f(v.into(), false)
    }
}

impl<'a> From<&'a [i32]> for UniformVariable<'a> {
    fn from(v: &'a [i32]) -> Self {
        UniformVariable::I32Array(v)
    }
}

impl<'a> From<&'a [f32]> for UniformVariable<'a> {
    fn from(v: &'a [f32]) -> Self {
        UniformVariable::F32Array(v)
    }
}

pub(crate) unsafe fn bind_uniform_variable(location: GLint, variable: &UniformVariable) {
    let transpose = |v: bool| if v { gl::TRUE } else { gl::FALSE };

    match *variable {
        UniformVariable::I32(v) => gl::Uniform1i(location, v),
        UniformVariable::F32(v) => gl::Uniform1f(location, v),
        UniformVariable::Vector2f(v) => gl::Uniform2f(location, v[0], v[1]),
        UniformVariable::Vector3f(v) => gl::Uniform3f(location, v[0], v[1], v[2]),
        UniformVariable::Vector4f(v) => gl::Uniform4f(location, v[0], v[1], v[2], v[3]),
        UniformVariable::Matrix2f(v, t) => gl::UniformMatrix2fv(location, 1, transpose(t), v[0].as_ptr()),
        UniformVariable::Matrix3f(v, t) => gl::UniformMatrix3fv(location, 1, transpose(t), v[0].as_ptr()),
        UniformVariable::Matrix4f(v, t) => gl::UniformMatrix4fv(location, 1, transpose(t), v[0].as_ptr()),
        UniformVariable::I32Array(v) => gl::Uniform1iv(location, v.len() as GLsizei, v.as_ptr()),
        UniformVariable::F32Array(v) => gl::Uniform1fv(location, v.len() as GLsizei, v.as_ptr()),
        UniformVariable::Vector2fArray(v) => {
            gl::Uniform2fv(location, v.len() as GLsizei, v.as_ptr() as *const GLfloat)
        }
        UniformVariable::Vector3fArray(v) => {
            gl::Uniform3fv(location, v.len() as GLsizei, v.as_ptr() as *const GLfloat)
        }
        UniformVariable::Vector4fArray(v) => {
            gl::Uniform4fv(location, v.len() as GLsizei, v.as_ptr() as *const GLfloat)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::SquareMatrix;

    #[test]
    fn conversions() {
        assert_eq!(UniformVariable::from(true), UniformVariable::I32(1));
        assert_eq!(
            UniformVariable::from(Vector3::new(1.0f32, 2.0, 3.0)),
            UniformVariable::Vector3f([1.0, 2.0, 3.0])
        );

        let m = Matrix2::new(1.0f32, 2.0, 3.0, 4.0);
        assert_eq!(
            UniformVariable::from(m),
            UniformVariable::Matrix2f([[1.0, 2.0], [3.0, 4.0]], false)
        );

        match UniformVariable::from(Matrix4::<f32>::identity()) {
            UniformVariable::Matrix4f(v, false) => assert_eq!(v[3][3], 1.0),
            _ => panic!(),
        }
    }
}
