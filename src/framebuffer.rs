//! Render targets made of color textures and a optional depth texture.

use std::path::Path;

use gl;
use gl::types::*;
use image::DynamicImage;
use smallvec::SmallVec;

use crate::backend::handle::{FramebufferObject, Handle};
use crate::backend::{self, Capabilities};
use crate::errors::*;
use crate::texture::{self, format, DepthImage, PixelFormat, PixelKind, Pixels, PixelsMut, Texture};
use crate::utils::image as codec;

/// Describes the attachments of a `Framebuffer`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FramebufferSetup {
    pub width: u32,
    pub height: u32,
    /// Attaches a depth texture.
    pub depth: bool,
    /// Attaches `color_attachments` color textures.
    pub color: bool,
    /// Color textures are allocated with floating point components.
    pub float_color: bool,
    pub samples: u32,
    pub color_attachments: usize,
}

impl FramebufferSetup {
    pub fn new(width: u32, height: u32) -> Self {
        FramebufferSetup {
            width,
            height,
            ..FramebufferSetup::default()
        }
    }
}

impl Default for FramebufferSetup {
    fn default() -> Self {
        FramebufferSetup {
            width: 0,
            height: 0,
            depth: true,
            color: true,
            float_color: false,
            samples: 1,
            color_attachments: 1,
        }
    }
}

#[derive(Debug, Default)]
pub struct Framebuffer {
    handle: Handle<FramebufferObject>,
    width: u32,
    height: u32,
    colors: Vec<Texture>,
    depth: Option<Texture>,
}

impl Framebuffer {
    pub fn new(setup: FramebufferSetup) -> Result<Framebuffer> {
        let caps = backend::capabilities()?;

        let color_attachments = if setup.color {
            setup.color_attachments
        } else {
            0
        };

        if color_attachments > caps.max_color_attachments as usize {
            return Err(Error::TooManyColorAttachments {
                requested: color_attachments,
                max: caps.max_color_attachments as usize,
            });
        }

        let samples = texture::resolve_samples(&caps, setup.samples);
        let mut fbo = Framebuffer {
            handle: Handle::new()?,
            width: setup.width,
            height: setup.height,
            colors: Vec::with_capacity(color_attachments),
            depth: None,
        };

        unsafe { gl::BindFramebuffer(gl::FRAMEBUFFER, fbo.id()) };
        let res = fbo.attach(&caps, setup, color_attachments, samples);
        unsafe { gl::BindFramebuffer(gl::FRAMEBUFFER, 0) };
        res?;

        Ok(fbo)
    }

    unsafe fn attach_inner(
        &mut self,
        caps: &Capabilities,
        setup: FramebufferSetup,
        color_attachments: usize,
        samples: u32,
    ) -> Result<()> {
        for i in 0..color_attachments {
            let kind = if setup.float_color {
                PixelKind::F32
            } else {
                PixelKind::U8
            };

            let color = Texture::new(self.width, self.height, PixelFormat::Rgba, Pixels::Alloc(kind), samples)?;

            if setup.float_color && samples <= 1 && caps.prefers_half_float_color() {
                color.bind();
                gl::TexImage2D(
                    gl::TEXTURE_2D,
                    0,
                    gl::RGBA16F as GLint,
                    self.width as GLsizei,
                    self.height as GLsizei,
                    0,
                    gl::RGBA,
                    gl::FLOAT,
                    ::std::ptr::null(),
                );
                color.unbind();
            }

            gl::FramebufferTexture2D(
                gl::FRAMEBUFFER,
                gl::COLOR_ATTACHMENT0 + i as GLenum,
                color.target().into(),
                color.id(),
                0,
            );

            self.colors.push(color);
        }

        if setup.depth {
            let kind = if caps.prefers_integer_depth() {
                PixelKind::U8
            } else {
                PixelKind::F32
            };

            let depth = Texture::new(self.width, self.height, PixelFormat::Depth, Pixels::Alloc(kind), samples)?;
            gl::FramebufferTexture2D(
                gl::FRAMEBUFFER,
                gl::DEPTH_ATTACHMENT,
                depth.target().into(),
                depth.id(),
                0,
            );

            self.depth = Some(depth);
        }

        backend::check()?;
        backend::check_framebuffer_status()
    }

    fn attach(
        &mut self,
        caps: &Capabilities,
        setup: FramebufferSetup,
        color_attachments: usize,
        samples: u32,
    ) -> Result<()> {
        let res = unsafe { self.attach_inner(caps, setup, color_attachments, samples) };
        if let Err(ref err) = res {
            error!("Failed to setup framebuffer {:?}, {}", self.handle, err);
        }

        res
    }

    /// Creates a framebuffer whose only color attachment is `texture`. The texture is
    /// not owned by the framebuffer.
    pub fn from_texture(texture: &Texture) -> Result<Framebuffer> {
        Framebuffer::wrap(texture.id(), texture.width(), texture.height())
    }

    /// Creates a framebuffer whose only color attachment is the 2D texture `id`.
    pub fn wrap(id: GLuint, width: u32, height: u32) -> Result<Framebuffer> {
        if id == 0 {
            return Err(Error::InvalidHandle);
        }

        let color = Texture::wrap(id, width, height);
        let mut fbo = Framebuffer {
            handle: Handle::new()?,
            width,
            height,
            colors: Vec::new(),
            depth: None,
        };

        let res = unsafe {
            gl::BindFramebuffer(gl::FRAMEBUFFER, fbo.id());
            gl::FramebufferTexture2D(
                gl::FRAMEBUFFER,
                gl::COLOR_ATTACHMENT0,
                gl::TEXTURE_2D,
                color.id(),
                0,
            );

            let res = backend::check().and_then(|_| backend::check_framebuffer_status());
            gl::BindFramebuffer(gl::FRAMEBUFFER, 0);
            res
        };

        if let Err(ref err) = res {
            error!("Failed to wrap texture {} into framebuffer, {}", id, err);
        }

        res?;
        fbo.colors.push(color);
        Ok(fbo)
    }

    /// Re-initializes this framebuffer in place, the previous objects are destroyed first.
    pub fn init(&mut self, setup: FramebufferSetup) -> Result<()> {
        self.destroy();
        *self = Framebuffer::new(setup)?;
        Ok(())
    }

    pub fn init_from_texture(&mut self, texture: &Texture) -> Result<()> {
        self.destroy();
        *self = Framebuffer::from_texture(texture)?;
        Ok(())
    }

    /// Binds this framebuffer as render target, and routes the fragment outputs into every
    /// color attachments.
    pub fn bind(&self, set_viewport: bool, clear: bool) -> Result<()> {
        if self.handle.is_empty() {
            return Err(Error::InvalidHandle);
        }

        let attachments: SmallVec<[GLenum; 8]> = (0..self.colors.len())
            .map(|i| gl::COLOR_ATTACHMENT0 + i as GLenum)
            .collect();

        unsafe {
            gl::BindFramebuffer(gl::FRAMEBUFFER, self.id());
            gl::DrawBuffers(attachments.len() as GLsizei, attachments.as_ptr());

            if set_viewport {
                gl::Viewport(0, 0, self.width as GLsizei, self.height as GLsizei);
            }

            if clear {
                gl::ClearDepthf(1.0);
                gl::ClearColor(0.0, 0.0, 0.0, 1.0);
                gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
            }

            backend::check()
        }
    }

    #[inline]
    pub fn unbind(&self) {
        unsafe { gl::BindFramebuffer(gl::FRAMEBUFFER, 0) };
    }

    /// Reads the pixels of color attachment `attachment`, or the depth attachment if
    /// `format` is `PixelFormat::Depth`.
    pub fn read(&self, mut pixels: PixelsMut, format: PixelFormat, attachment: usize) -> Result<()> {
        if self.handle.is_empty() {
            return Err(Error::InvalidHandle);
        }

        let format = format.normalize();
        if format.is_color() && attachment >= self.colors.len() {
            return Err(Error::OutOfBounds);
        }

        let expected = format::expected_len(self.width, self.height, format, pixels.kind());
        if pixels.len() < expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        let caps = backend::capabilities()?;
        let transfer_format = format.transfer_format(&caps)?;
        let transfer_type = format::transfer_type(format, pixels.kind());

        unsafe {
            gl::BindFramebuffer(gl::FRAMEBUFFER, self.id());

            if format.is_color() {
                gl::ReadBuffer(gl::COLOR_ATTACHMENT0 + attachment as GLenum);
            }

            gl::ReadPixels(
                0,
                0,
                self.width as GLsizei,
                self.height as GLsizei,
                transfer_format,
                transfer_type,
                pixels.as_mut_ptr(),
            );

            if format.is_color() {
                gl::ReadBuffer(gl::COLOR_ATTACHMENT0);
            }

            gl::BindFramebuffer(gl::FRAMEBUFFER, 0);
            backend::check()
        }
    }

    /// Reads the pixels of color attachment `attachment` as a 8-bits image.
    pub fn read_image(&self, format: PixelFormat, vertical_flip: bool, attachment: usize) -> Result<DynamicImage> {
        let caps = backend::capabilities()?;
        texture::read_image_with(&caps, self.width, self.height, format, vertical_flip, |pixels, format| {
            self.read(pixels, format, attachment)
        })
    }

    /// Reads the depth attachment as a 32-bits float image.
    pub fn read_depth_image(&self, vertical_flip: bool) -> Result<DepthImage> {
        if self.depth.is_none() {
            return Err(Error::InvalidTarget("framebuffer has no depth attachment".into()));
        }

        texture::read_depth_image_with(self.width, self.height, vertical_flip, |pixels, format| {
            self.read(pixels, format, 0)
        })
    }

    /// Saves color attachment `attachment` as a PNG file with 3 channels.
    pub fn save<P: AsRef<Path>>(&self, path: P, vertical_flip: bool, attachment: usize) -> Result<()> {
        let image = self.read_image(PixelFormat::Rgb, false, attachment)?;
        codec::save_rgb_png(path, self.width, self.height, image.into_rgb8().into_raw(), vertical_flip)
    }

    /// Releases the framebuffer and every attachments it owns.
    pub fn destroy(&mut self) {
        self.handle.destroy();
        self.colors.clear();
        self.depth = None;
        self.width = 0;
        self.height = 0;
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
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn color_texture(&self, index: usize) -> Option<&Texture> {
        self.colors.get(index)
    }

    #[inline]
    pub fn color_texture_mut(&mut self, index: usize) -> Option<&mut Texture> {
        self.colors.get_mut(index)
    }

    #[inline]
    pub fn color_textures(&self) -> &[Texture] {
        &self.colors
    }

    #[inline]
    pub fn depth_texture(&self) -> Option<&Texture> {
        self.depth.as_ref()
    }
}
