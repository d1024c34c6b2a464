//! Pixel formats and their driver representations.

use std::os::raw::c_void;
use std::ptr;

use gl;
use gl::types::*;

use crate::backend::Capabilities;
use crate::errors::*;

/// Logical layout of the channels of a pixel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Red,
    Green,
    Blue,
    /// Single channel alias of `Red`, it is normalized before any driver call.
    Luminance,
    Rg,
    Rgb,
    Rgba,
    /// Desktop only.
    Bgr,
    /// Desktop only.
    Bgra,
    Depth,
}

impl PixelFormat {
    /// Maps `Luminance` to `Red`, leaves others untouched.
    #[inline]
    pub fn normalize(self) -> PixelFormat {
        match self {
            PixelFormat::Luminance => PixelFormat::Red,
            v => v,
        }
    }

    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Red
            | PixelFormat::Green
            | PixelFormat::Blue
            | PixelFormat::Luminance
            | PixelFormat::Depth => 1,
            PixelFormat::Rg => 2,
            PixelFormat::Rgb | PixelFormat::Bgr => 3,
            PixelFormat::Rgba | PixelFormat::Bgra => 4,
        }
    }

    #[inline]
    pub fn is_color(self) -> bool {
        self != PixelFormat::Depth
    }

    /// Selects the format of a image with `channels` interleaved channels.
    pub fn from_channels(channels: usize) -> Result<PixelFormat> {
        match channels {
            1 => Ok(PixelFormat::Red),
            2 => Ok(PixelFormat::Rg),
            3 => Ok(PixelFormat::Rgb),
            4 => Ok(PixelFormat::Rgba),
            n => Err(Error::InvalidFormat(format!("{} channels", n))),
        }
    }

    /// The client-side `format` argument of `glTexImage2D` and `glReadPixels`.
    pub fn transfer_format(self, caps: &Capabilities) -> Result<GLenum> {
        let format = match self.normalize() {
            PixelFormat::Red | PixelFormat::Luminance => gl::RED,
            PixelFormat::Green => gl::GREEN,
            PixelFormat::Blue => gl::BLUE,
            PixelFormat::Rg => gl::RG,
            PixelFormat::Rgb => gl::RGB,
            PixelFormat::Rgba => gl::RGBA,
            PixelFormat::Bgr | PixelFormat::Bgra if !caps.supports_bgr_formats() => {
                return Err(Error::InvalidFormat(format!(
                    "{:?} is not available on {:?}",
                    self, caps.version
                )));
            }
            PixelFormat::Bgr => gl::BGR,
            PixelFormat::Bgra => gl::BGRA,
            PixelFormat::Depth => gl::DEPTH_COMPONENT,
        };

        Ok(format)
    }
}

/// Element type of host-side pixel data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PixelKind {
    U8,
    F32,
}

impl PixelKind {
    #[inline]
    pub fn element_size(self) -> usize {
        match self {
            PixelKind::U8 => 1,
            PixelKind::F32 => 4,
        }
    }
}

/// Pixel data to upload.
#[derive(Debug, Copy, Clone)]
pub enum Pixels<'a> {
    U8(&'a [u8]),
    F32(&'a [f32]),
    /// Allocates storage without initializing it.
    Alloc(PixelKind),
}

impl<'a> Pixels<'a> {
    #[inline]
    pub fn kind(&self) -> PixelKind {
        match *self {
            Pixels::U8(_) => PixelKind::U8,
            Pixels::F32(_) => PixelKind::F32,
            Pixels::Alloc(kind) => kind,
        }
    }

    /// Number of elements, `None` if there is no data.
    #[inline]
    pub fn len(&self) -> Option<usize> {
        match *self {
            Pixels::U8(v) => Some(v.len()),
            Pixels::F32(v) => Some(v.len()),
            Pixels::Alloc(_) => None,
        }
    }

    pub(crate) fn as_ptr(&self) -> *const c_void {
        match *self {
            Pixels::U8(v) => v.as_ptr() as *const c_void,
            Pixels::F32(v) => v.as_ptr() as *const c_void,
            Pixels::Alloc(_) => ptr::null(),
        }
    }
}

/// Destination of pixels being read back.
#[derive(Debug)]
pub enum PixelsMut<'a> {
    U8(&'a mut [u8]),
    F32(&'a mut [f32]),
}

impl<'a> PixelsMut<'a> {
    #[inline]
    pub fn kind(&self) -> PixelKind {
        match *self {
            PixelsMut::U8(_) => PixelKind::U8,
            PixelsMut::F32(_) => PixelKind::F32,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        match *self {
            PixelsMut::U8(ref v) => v.len(),
            PixelsMut::F32(ref v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut c_void {
        match *self {
            PixelsMut::U8(ref mut v) => v.as_mut_ptr() as *mut c_void,
            PixelsMut::F32(ref mut v) => v.as_mut_ptr() as *mut c_void,
        }
    }
}

/// Resolves the sized internal format of a texture.
pub fn internal_format(format: PixelFormat, kind: PixelKind, caps: &Capabilities) -> Result<GLenum> {
    let float = kind == PixelKind::F32;

    let internal = match format.normalize() {
        PixelFormat::Red | PixelFormat::Luminance if float => gl::R32F,
        PixelFormat::Red | PixelFormat::Luminance => gl::R8,
        PixelFormat::Rg if float => gl::RG32F,
        PixelFormat::Rg => gl::RG8,
        PixelFormat::Rgb if float => gl::RGB32F,
        PixelFormat::Rgb => gl::RGB8,
        PixelFormat::Rgba if float => gl::RGBA32F,
        PixelFormat::Rgba => gl::RGBA8,
        PixelFormat::Bgr | PixelFormat::Bgra if !caps.supports_bgr_formats() => {
            return Err(Error::InvalidFormat(format!(
                "{:?} is not available on {:?}",
                format, caps.version
            )));
        }
        PixelFormat::Bgr => gl::RGB,
        PixelFormat::Bgra => gl::RGBA,
        PixelFormat::Depth if float => gl::DEPTH_COMPONENT32F,
        PixelFormat::Depth => gl::DEPTH_COMPONENT,
        PixelFormat::Green | PixelFormat::Blue => {
            return Err(Error::InvalidFormat(format!(
                "{:?} could not be used as internal format",
                format
            )));
        }
    };

    Ok(internal)
}

/// The client-side `type` argument of pixel transfers.
pub fn transfer_type(format: PixelFormat, kind: PixelKind) -> GLenum {
    match (format, kind) {
        (_, PixelKind::F32) => gl::FLOAT,
        (PixelFormat::Depth, PixelKind::U8) => gl::UNSIGNED_INT,
        (_, PixelKind::U8) => gl::UNSIGNED_BYTE,
    }
}

/// Number of `kind` elements required to hold a `width` x `height` image.
pub fn expected_len(width: u32, height: u32, format: PixelFormat, kind: PixelKind) -> usize {
    let texels = width as usize * height as usize * format.channels();
    match (format, kind) {
        // Depth transfers with unsigned bytes use 32-bits integers.
        (PixelFormat::Depth, PixelKind::U8) => texels * 4,
        _ => texels,
    }
}
