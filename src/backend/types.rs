use gl;
use gl::types::*;

/// Hint abouts how the data store of a buffer will be accessed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    StaticDraw,
    StaticRead,
    StaticCopy,
    DynamicDraw,
    DynamicRead,
    DynamicCopy,
    StreamDraw,
    StreamRead,
    StreamCopy,
}

impl Default for BufferUsage {
    fn default() -> Self {
        BufferUsage::StaticDraw
    }
}

impl From<BufferUsage> for GLenum {
    fn from(usage: BufferUsage) -> Self {
        match usage {
            BufferUsage::StaticDraw => gl::STATIC_DRAW,
            BufferUsage::StaticRead => gl::STATIC_READ,
            BufferUsage::StaticCopy => gl::STATIC_COPY,
            BufferUsage::DynamicDraw => gl::DYNAMIC_DRAW,
            BufferUsage::DynamicRead => gl::DYNAMIC_READ,
            BufferUsage::DynamicCopy => gl::DYNAMIC_COPY,
            BufferUsage::StreamDraw => gl::STREAM_DRAW,
            BufferUsage::StreamRead => gl::STREAM_READ,
            BufferUsage::StreamCopy => gl::STREAM_COPY,
        }
    }
}

/// Sampling function used when a texel is magnified or minified.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

impl From<TextureFilter> for GLenum {
    fn from(filter: TextureFilter) -> Self {
        match filter {
            TextureFilter::Nearest => gl::NEAREST,
            TextureFilter::Linear => gl::LINEAR,
        }
    }
}

/// Behaviour when texture coordinates fall outside `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextureWrap {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

impl From<TextureWrap> for GLenum {
    fn from(wrap: TextureWrap) -> Self {
        match wrap {
            TextureWrap::Repeat => gl::REPEAT,
            TextureWrap::MirroredRepeat => gl::MIRRORED_REPEAT,
            TextureWrap::ClampToEdge => gl::CLAMP_TO_EDGE,
        }
    }
}

/// Scalar component type of vertex attributes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Byte,
    UByte,
    Short,
    UShort,
    Int,
    UInt,
    Float,
    Double,
}

impl ScalarType {
    /// Size in bytes of one component.
    pub fn size(self) -> usize {
        match self {
            ScalarType::Byte | ScalarType::UByte => 1,
            ScalarType::Short | ScalarType::UShort => 2,
            ScalarType::Int | ScalarType::UInt | ScalarType::Float => 4,
            ScalarType::Double => 8,
        }
    }

    #[inline]
    pub fn is_integer(self) -> bool {
        match self {
            ScalarType::Float | ScalarType::Double => false,
            _ => true,
        }
    }
}

impl From<ScalarType> for GLenum {
    fn from(scalar: ScalarType) -> Self {
        match scalar {
            ScalarType::Byte => gl::BYTE,
            ScalarType::UByte => gl::UNSIGNED_BYTE,
            ScalarType::Short => gl::SHORT,
            ScalarType::UShort => gl::UNSIGNED_SHORT,
            ScalarType::Int => gl::INT,
            ScalarType::UInt => gl::UNSIGNED_INT,
            ScalarType::Float => gl::FLOAT,
            ScalarType::Double => gl::DOUBLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_sizes() {
        assert_eq!(ScalarType::UByte.size(), 1);
        assert_eq!(ScalarType::Short.size(), 2);
        assert_eq!(ScalarType::Float.size(), 4);
        assert_eq!(ScalarType::Double.size(), 8);
        assert!(ScalarType::UInt.is_integer());
        assert!(!ScalarType::Double.is_integer());
    }

    #[test]
    fn enums() {
        assert_eq!(GLenum::from(BufferUsage::default()), gl::STATIC_DRAW);
        assert_eq!(GLenum::from(TextureWrap::ClampToEdge), gl::CLAMP_TO_EDGE);
        assert_eq!(GLenum::from(TextureFilter::Linear), gl::LINEAR);
        assert_eq!(GLenum::from(ScalarType::Double), gl::DOUBLE);
    }
}
