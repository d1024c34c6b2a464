//! Two dimensional textures, optionally multisampled.
//!
//! A `Texture` owns its driver object unless it was created with `Texture::wrap`. Pixels
//! are uploaded from tagged host buffers (`Pixels`), which decide the element type of the
//! transfer, and read back into `PixelsMut`.
//!
//! ```rust,ignore
//! let texture = Texture::new(256, 256, PixelFormat::Rgba, Pixels::Alloc(PixelKind::U8), 1)?;
//! texture.bind_unit(0);
//! ```

pub mod cubemap;
pub mod format;

pub use self::cubemap::TextureCubeMap;
pub use self::format::{PixelFormat, PixelKind, Pixels, PixelsMut};

/// Single channel image of depth values in `[0, 1]`.
pub type DepthImage = ImageBuffer<Luma<f32>, Vec<f32>>;

use std::path::Path;

use gl;
use gl::types::*;
use image::{DynamicImage, ImageBuffer, Luma};

use crate::backend::handle::{Handle, TextureObject};
use crate::backend::{self, Capabilities, TextureFilter, TextureWrap};
use crate::errors::*;
use crate::framebuffer::Framebuffer;
use crate::utils::finally;
use crate::utils::image::{self as codec, ImageData};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    Texture2D,
    Texture2DMultisample,
}

impl From<TextureTarget> for GLenum {
    fn from(target: TextureTarget) -> Self {
        match target {
            TextureTarget::Texture2D => gl::TEXTURE_2D,
            TextureTarget::Texture2DMultisample => gl::TEXTURE_2D_MULTISAMPLE,
        }
    }
}

#[derive(Debug)]
pub struct Texture {
    handle: Handle<TextureObject>,
    width: u32,
    height: u32,
    samples: u32,
    target: TextureTarget,
    format: PixelFormat,
    kind: PixelKind,
}

impl Default for Texture {
    fn default() -> Self {
        Texture {
            handle: Handle::empty(),
            width: 0,
            height: 0,
            samples: 1,
            target: TextureTarget::Texture2D,
            format: PixelFormat::Rgba,
            kind: PixelKind::U8,
        }
    }
}

impl Texture {
    /// Creates a `width` x `height` texture. Multisampled textures (`samples > 1`) are
    /// allocated without being written.
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Pixels,
        samples: u32,
    ) -> Result<Texture> {
        let caps = backend::capabilities()?;
        check_upload(&caps, width, height, format, &pixels)?;

        let mut texture = Texture::allocate(&caps, samples)?;
        texture.update(width, height, format, pixels)?;
        Ok(texture)
    }

    /// Creates a texture from a image file. The pixel format is selected by the number of
    /// channels of the image.
    pub fn from_file<P: AsRef<Path>>(path: P, vertical_flip: bool, samples: u32) -> Result<Texture> {
        let image = codec::open(path)?;
        let data = ImageData::from_image(&image, vertical_flip);
        let format = data.format()?;

        Texture::new(data.width, data.height, format, data.pixels.as_pixels(), samples)
    }

    /// Creates a texture from a decoded image, whose channels must match `format`.
    pub fn from_image(
        image: &DynamicImage,
        format: PixelFormat,
        vertical_flip: bool,
        samples: u32,
    ) -> Result<Texture> {
        check_channels(image, format)?;

        let data = ImageData::from_image(image, vertical_flip);
        Texture::new(data.width, data.height, format, data.pixels.as_pixels(), samples)
    }

    /// Wraps a texture which is owned somewhere else. The name is never released by the
    /// returned `Texture`.
    pub fn wrap(id: GLuint, width: u32, height: u32) -> Texture {
        Texture {
            handle: Handle::wrap(id),
            width,
            height,
            ..Texture::default()
        }
    }

    /// Re-initializes this texture in place, the previous object is destroyed first.
    pub fn init(
        &mut self,
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Pixels,
        samples: u32,
    ) -> Result<()> {
        self.destroy();
        *self = Texture::new(width, height, format, pixels, samples)?;
        Ok(())
    }

    pub fn init_from_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        vertical_flip: bool,
        samples: u32,
    ) -> Result<()> {
        self.destroy();
        *self = Texture::from_file(path, vertical_flip, samples)?;
        Ok(())
    }

    pub fn init_from_image(
        &mut self,
        image: &DynamicImage,
        format: PixelFormat,
        vertical_flip: bool,
        samples: u32,
    ) -> Result<()> {
        self.destroy();
        *self = Texture::from_image(image, format, vertical_flip, samples)?;
        Ok(())
    }

    pub fn init_wrap(&mut self, id: GLuint, width: u32, height: u32) {
        self.destroy();
        *self = Texture::wrap(id, width, height);
    }

    fn allocate(caps: &Capabilities, samples: u32) -> Result<Texture> {
        let samples = resolve_samples(caps, samples);
        let target = if samples > 1 {
            TextureTarget::Texture2DMultisample
        } else {
            TextureTarget::Texture2D
        };

        let handle = Handle::new()?;

        unsafe {
            gl::BindTexture(target.into(), handle.id());

            // Sampler states are not available for multisample targets.
            if target == TextureTarget::Texture2D {
                bind_texture_params(gl::TEXTURE_2D, TextureFilter::Linear, TextureWrap::ClampToEdge);
            }

            gl::BindTexture(target.into(), 0);
            backend::check()?;
        }

        Ok(Texture {
            handle,
            samples,
            target,
            ..Texture::default()
        })
    }

    /// Replaces the contents and dimensions of this texture.
    pub fn update(&mut self, width: u32, height: u32, format: PixelFormat, pixels: Pixels) -> Result<()> {
        if self.handle.is_empty() {
            return Err(Error::InvalidHandle);
        }

        let caps = backend::capabilities()?;
        check_upload(&caps, width, height, format, &pixels)?;

        let format = format.normalize();
        let kind = pixels.kind();

        let mut internal = format::internal_format(format, kind, &caps)?;
        let transfer_format = format.transfer_format(&caps)?;
        let transfer_type = format::transfer_type(format, kind);

        unsafe {
            let target = self.target.into();
            gl::BindTexture(target, self.handle.id());

            if self.samples > 1 {
                if caps.supports_multisample_storage() {
                    if format == PixelFormat::Depth {
                        internal = gl::DEPTH_COMPONENT24;
                    }

                    gl::TexStorage2DMultisample(
                        target,
                        self.samples as GLsizei,
                        internal,
                        width as GLsizei,
                        height as GLsizei,
                        gl::TRUE,
                    );
                } else {
                    gl::TexImage2DMultisample(
                        target,
                        self.samples as GLsizei,
                        internal,
                        width as GLsizei,
                        height as GLsizei,
                        gl::TRUE,
                    );
                }
            } else {
                gl::TexImage2D(
                    target,
                    0,
                    internal as GLint,
                    width as GLsizei,
                    height as GLsizei,
                    0,
                    transfer_format,
                    transfer_type,
                    pixels.as_ptr(),
                );
            }

            gl::BindTexture(target, 0);
            backend::check()?;
        }

        self.width = width;
        self.height = height;
        self.format = format;
        self.kind = kind;
        Ok(())
    }

    /// Replaces the contents with a decoded image, whose channels must match `format`.
    pub fn update_image(&mut self, image: &DynamicImage, format: PixelFormat, vertical_flip: bool) -> Result<()> {
        check_channels(image, format)?;

        let data = ImageData::from_image(image, vertical_flip);
        self.update(data.width, data.height, format, data.pixels.as_pixels())
    }

    /// Copies the contents of `src`, which must have the same dimensions.
    pub fn copy_from(&mut self, src: &Texture) -> Result<()> {
        if self.handle.is_empty() || src.handle.is_empty() {
            return Err(Error::InvalidHandle);
        }

        if self.width != src.width || self.height != src.height {
            return Err(Error::SizeMismatch {
                expected: self.width as usize * self.height as usize,
                actual: src.width as usize * src.height as usize,
            });
        }

        if self.target != TextureTarget::Texture2D || src.target != TextureTarget::Texture2D {
            return Err(Error::InvalidTarget("only 2D textures could be copied".into()));
        }

        let caps = backend::capabilities()?;
        if caps.supports_copy_image() {
            unsafe {
                gl::CopyImageSubData(
                    src.id(),
                    gl::TEXTURE_2D,
                    0,
                    0,
                    0,
                    0,
                    self.id(),
                    gl::TEXTURE_2D,
                    0,
                    0,
                    0,
                    0,
                    self.width as GLsizei,
                    self.height as GLsizei,
                    1,
                );
                backend::check()?;
            }
        } else {
            let internal = format::internal_format(self.format, self.kind, &caps)?;
            let fbo = Framebuffer::from_texture(src)?;
            let unbind = finally(|| fbo.unbind());
            fbo.bind(false, false)?;

            unsafe {
                gl::BindTexture(gl::TEXTURE_2D, self.id());
                gl::CopyTexImage2D(
                    gl::TEXTURE_2D,
                    0,
                    internal,
                    0,
                    0,
                    self.width as GLsizei,
                    self.height as GLsizei,
                    0,
                );
                gl::BindTexture(gl::TEXTURE_2D, 0);
            }

            drop(unbind);
            unsafe { backend::check()? };
        }

        Ok(())
    }

    pub fn set_filter(&self, min: TextureFilter, mag: TextureFilter) -> Result<()> {
        self.check_sampler_states()?;

        unsafe {
            gl::BindTexture(gl::TEXTURE_2D, self.id());
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, GLenum::from(min) as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, GLenum::from(mag) as GLint);
            backend::check()
        }
    }

    pub fn set_wrap_mode(&self, s: TextureWrap, t: TextureWrap) -> Result<()> {
        self.check_sampler_states()?;

        unsafe {
            gl::BindTexture(gl::TEXTURE_2D, self.id());
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, GLenum::from(s) as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, GLenum::from(t) as GLint);
            backend::check()
        }
    }

    fn check_sampler_states(&self) -> Result<()> {
        if self.handle.is_empty() {
            return Err(Error::InvalidHandle);
        }

        if self.target != TextureTarget::Texture2D {
            return Err(Error::InvalidTarget(
                "multisample textures have no sampler states".into(),
            ));
        }

        Ok(())
    }

    #[inline]
    pub fn bind(&self) {
        unsafe { gl::BindTexture(self.target.into(), self.id()) };
    }

    /// Binds this texture to texture unit `unit`, counting from zero.
    #[inline]
    pub fn bind_unit(&self, unit: u32) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            gl::BindTexture(self.target.into(), self.id());
        }
    }

    #[inline]
    pub fn unbind(&self) {
        unsafe { gl::BindTexture(self.target.into(), 0) };
    }

    /// Reads the pixels back into `pixels`, converted to `format`.
    pub fn read(&self, mut pixels: PixelsMut, format: PixelFormat) -> Result<()> {
        if self.handle.is_empty() {
            return Err(Error::InvalidHandle);
        }

        if self.target != TextureTarget::Texture2D {
            return Err(Error::InvalidTarget(
                "multisample textures could not be read back".into(),
            ));
        }

        let caps = backend::capabilities()?;
        if !caps.supports_get_tex_image() {
            let fbo = Framebuffer::from_texture(self)?;
            return fbo.read(pixels, format, 0);
        }

        let format = format.normalize();
        let expected = format::expected_len(self.width, self.height, format, pixels.kind());
        if pixels.len() < expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        let transfer_format = format.transfer_format(&caps)?;
        let transfer_type = format::transfer_type(format, pixels.kind());

        unsafe {
            gl::BindTexture(gl::TEXTURE_2D, self.id());
            gl::GetTexImage(gl::TEXTURE_2D, 0, transfer_format, transfer_type, pixels.as_mut_ptr());
            gl::BindTexture(gl::TEXTURE_2D, 0);
            backend::check()
        }
    }

    /// Reads the pixels back as a 8-bits image.
    pub fn read_image(&self, format: PixelFormat, vertical_flip: bool) -> Result<DynamicImage> {
        let caps = backend::capabilities()?;
        read_image_with(&caps, self.width, self.height, format, vertical_flip, |pixels, format| {
            self.read(pixels, format)
        })
    }

    /// Reads a depth texture back as a 32-bits float image.
    pub fn read_depth_image(&self, vertical_flip: bool) -> Result<DepthImage> {
        if self.format != PixelFormat::Depth {
            return Err(Error::InvalidFormat(format!("{:?} is not a depth texture", self.format)));
        }

        read_depth_image_with(self.width, self.height, vertical_flip, |pixels, format| {
            self.read(pixels, format)
        })
    }

    /// Saves the pixels as a PNG file with 3 channels.
    pub fn save<P: AsRef<Path>>(&self, path: P, vertical_flip: bool) -> Result<()> {
        let image = self.read_image(PixelFormat::Rgb, false)?;
        codec::save_rgb_png(path, self.width, self.height, image.into_rgb8().into_raw(), vertical_flip)
    }

    /// Releases the driver object if it is owned, and resets this texture.
    pub fn destroy(&mut self) {
        self.handle.destroy();
        *self = Texture::default();
    }

    #[inline]
    pub fn id(&self) -> GLuint {
        self.handle.id()
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.handle.is_empty()
    }

    #[inline]
    pub fn is_owned(&self) -> bool {
        self.handle.is_owned()
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn samples(&self) -> u32 {
        self.samples
    }

    #[inline]
    pub fn target(&self) -> TextureTarget {
        self.target
    }

    /// The format of the last upload.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    #[inline]
    pub fn kind(&self) -> PixelKind {
        self.kind
    }
}

/// Clamps the sample count to what the context supports.
pub fn resolve_samples(caps: &Capabilities, samples: u32) -> u32 {
    if samples <= 1 {
        1
    } else if !caps.supports_multisample_texture() {
        error!(
            "Multisample textures are not supported by {:?}, fallback to non-multisample texture.",
            caps.version
        );
        1
    } else {
        samples
    }
}

fn check_channels(image: &DynamicImage, format: PixelFormat) -> Result<()> {
    let actual = image.color().channel_count() as usize;
    if actual != format.channels() {
        return Err(Error::ChannelMismatch {
            expected: format.channels(),
            actual,
        });
    }

    Ok(())
}

/// Validates formats and data length before anything is sent to the driver.
fn check_upload(caps: &Capabilities, width: u32, height: u32, format: PixelFormat, pixels: &Pixels) -> Result<()> {
    let format = format.normalize();
    format::internal_format(format, pixels.kind(), caps)?;
    format.transfer_format(caps)?;

    if let Some(len) = pixels.len() {
        let expected = format::expected_len(width, height, format, pixels.kind());
        if len < expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: len,
            });
        }
    }

    Ok(())
}

pub(crate) unsafe fn bind_texture_params(target: GLenum, filter: TextureFilter, wrap: TextureWrap) {
    let filter = GLenum::from(filter) as GLint;
    let wrap = GLenum::from(wrap) as GLint;

    gl::TexParameteri(target, gl::TEXTURE_MIN_FILTER, filter);
    gl::TexParameteri(target, gl::TEXTURE_MAG_FILTER, filter);
    gl::TexParameteri(target, gl::TEXTURE_WRAP_S, wrap);
    gl::TexParameteri(target, gl::TEXTURE_WRAP_T, wrap);
}

/// Reads 8-bits pixels with `read` and assembles them into a image. RGB reads go through
/// RGBA on contexts which could not read RGB back.
pub(crate) fn read_image_with<F>(
    caps: &Capabilities,
    width: u32,
    height: u32,
    format: PixelFormat,
    vertical_flip: bool,
    mut read: F,
) -> Result<DynamicImage>
where
    F: FnMut(PixelsMut, PixelFormat) -> Result<()>,
{
    let format = format.normalize();
    match format {
        PixelFormat::Depth => {
            return Err(Error::InvalidFormat(
                "depth is read with `read_depth_image`".into(),
            ));
        }
        PixelFormat::Bgr | PixelFormat::Bgra => {
            return Err(Error::InvalidFormat(format!(
                "{:?} could not be read as image",
                format
            )));
        }
        _ => {}
    }

    let rgba_fallback = format == PixelFormat::Rgb && !caps.supports_rgb_read_back();
    let (transfer, channels) = if rgba_fallback {
        (PixelFormat::Rgba, 4)
    } else {
        (format, format.channels())
    };

    let mut buf = vec![0u8; width as usize * height as usize * channels];
    read(PixelsMut::U8(&mut buf), transfer)?;

    let (buf, channels) = if rgba_fallback {
        (codec::strip_alpha(&buf), 3)
    } else {
        (buf, channels)
    };

    let image = codec::from_raw(width, height, channels, buf)?;
    Ok(if vertical_flip { image.flipv() } else { image })
}

/// Reads 32-bits depth values with `read` and assembles them into a image.
pub(crate) fn read_depth_image_with<F>(width: u32, height: u32, vertical_flip: bool, mut read: F) -> Result<DepthImage>
where
    F: FnMut(PixelsMut, PixelFormat) -> Result<()>,
{
    let mut buf = vec![0f32; width as usize * height as usize];
    read(PixelsMut::F32(&mut buf), PixelFormat::Depth)?;

    let image = DepthImage::from_raw(width, height, buf)
        .ok_or_else(|| Error::Image(format!("invalid depth image of {}x{}", width, height)))?;

    Ok(if vertical_flip {
        ::image::imageops::flip_vertical(&image)
    } else {
        image
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Extensions, Version};

    #[test]
    fn samples() {
        let desktop = Capabilities::with_version(Version::GL(4, 1), Extensions::default());
        assert_eq!(resolve_samples(&desktop, 0), 1);
        assert_eq!(resolve_samples(&desktop, 4), 4);

        let es = Capabilities::with_version(Version::ES(3, 0), Extensions::default());
        assert_eq!(resolve_samples(&es, 4), 1);
    }

    #[test]
    fn read_through_rgba() {
        let es = Capabilities::with_version(Version::ES(3, 0), Extensions::default());

        let image = read_image_with(&es, 2, 1, PixelFormat::Rgb, false, |pixels, format| {
            assert_eq!(format, PixelFormat::Rgba);
            match pixels {
                PixelsMut::U8(v) => v.copy_from_slice(&[1, 2, 3, 255, 4, 5, 6, 255]),
                _ => unreachable!(),
            }
            Ok(())
        })
        .unwrap();

        assert_eq!(image.into_rgb8().into_raw(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn read_flipped() {
        let desktop = Capabilities::with_version(Version::GL(3, 3), Extensions::default());

        let image = read_image_with(&desktop, 1, 2, PixelFormat::Luminance, true, |pixels, format| {
            assert_eq!(format, PixelFormat::Red);
            match pixels {
                PixelsMut::U8(v) => v.copy_from_slice(&[7, 9]),
                _ => unreachable!(),
            }
            Ok(())
        })
        .unwrap();

        assert_eq!(image.into_luma8().into_raw(), vec![9, 7]);
    }

    #[test]
    fn depth_is_not_a_color_image() {
        let desktop = Capabilities::with_version(Version::GL(3, 3), Extensions::default());
        let res = read_image_with(&desktop, 1, 1, PixelFormat::Depth, false, |_, _| Ok(()));
        assert!(res.is_err());
    }

    #[test]
    fn read_depth() {
        let image = read_depth_image_with(2, 2, true, |pixels, format| {
            assert_eq!(format, PixelFormat::Depth);
            match pixels {
                PixelsMut::F32(v) => v.copy_from_slice(&[0.0, 0.25, 0.5, 1.0]),
                _ => unreachable!(),
            }
            Ok(())
        })
        .unwrap();

        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(0, 0)[0], 0.5);
        assert_eq!(image.into_raw(), vec![0.5, 1.0, 0.0, 0.25]);

        let res = read_depth_image_with(1, 1, false, |_, _| Err(Error::InvalidHandle));
        match res {
            Err(Error::InvalidHandle) => {}
            _ => panic!(),
        }
    }
}
