use std::io;

use crate::shader::ShaderStage;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "OpenGL functions and capabilities have not been loaded yet.")]
    NotInitialized,
    #[fail(display = "OpenGL implementation doesn\'t support {}.", _0)]
    Requirement(String),
    #[fail(display = "Failed to allocate {} object.", _0)]
    Allocation(&'static str),
    #[fail(display = "Handle is empty or has been destroyed.")]
    InvalidHandle,
    #[fail(display = "Invalid target, {}.", _0)]
    InvalidTarget(String),
    #[fail(display = "Invalid pixel format, {}.", _0)]
    InvalidFormat(String),
    #[fail(display = "Expects {} channels, but got {}.", expected, actual)]
    ChannelMismatch { expected: usize, actual: usize },
    #[fail(display = "Expects at least {} elements, but got {}.", expected, actual)]
    SizeMismatch { expected: usize, actual: usize },
    #[fail(
        display = "Too many color attachments, requested {} while at most {} are available.",
        requested, max
    )]
    TooManyColorAttachments { requested: usize, max: usize },
    #[fail(display = "[GL] Framebuffer is incomplete. {}", _0)]
    FramebufferIncomplete(String),
    #[fail(display = "Failed to compile {:?} shader, errors: \n{}", stage, log)]
    ShaderCompile { stage: ShaderStage, log: String },
    #[fail(display = "Failed to link program, errors: \n{}", _0)]
    ShaderLink(String),
    #[fail(display = "Another program is bound currently.")]
    NotBound,
    #[fail(display = "{} is not supported.", _0)]
    Unsupported(String),
    #[fail(display = "Out of bounds.")]
    OutOfBounds,
    #[fail(display = "IO: {}", _0)]
    Io(String),
    #[fail(display = "Image: {}", _0)]
    Image(String),
    #[fail(display = "Watch: {}", _0)]
    Watch(String),
    #[fail(display = "[GL] {}", _0)]
    Driver(String),
    #[fail(display = "Settings: {}", _0)]
    Settings(String),
}

pub type Result<T> = ::std::result::Result<T, Error>;

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(format!("{}", err))
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Error {
        Error::Image(format!("{}", err))
    }
}

impl From<notify::Error> for Error {
    fn from(err: notify::Error) -> Error {
        Error::Watch(format!("{}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Settings(format!("{}", err))
    }
}
