use std::path::Path;

use gl;
use gl::types::*;
use image::DynamicImage;

use crate::backend::handle::{Handle, TextureObject};
use crate::backend::{self, Capabilities, TextureFilter, TextureWrap};
use crate::errors::*;
use crate::utils::finally;
use crate::utils::image::{self as codec, ImageData};

use super::format::{self, PixelFormat};

/// Six square faces, in the order of +X, -X, +Y, -Y, +Z and -Z.
#[derive(Debug, Default)]
pub struct TextureCubeMap {
    handle: Handle<TextureObject>,
    size: (u32, u32),
    format: Option<PixelFormat>,
}

impl TextureCubeMap {
    /// Creates a cube map from six image files, which must share the same channels.
    pub fn from_files<P: AsRef<Path>>(paths: [P; 6]) -> Result<TextureCubeMap> {
        let mut faces = Vec::with_capacity(6);
        for path in &paths {
            faces.push(ImageData::from_image(&codec::open(path)?, false));
        }

        let format = faces[0].format()?;
        for face in &faces[1..] {
            if face.format()? != format {
                return Err(Error::ChannelMismatch {
                    expected: faces[0].channels,
                    actual: face.channels,
                });
            }
        }

        TextureCubeMap::from_faces(&faces, format)
    }

    /// Creates a cube map from six non-empty images of the same dimensions.
    pub fn from_images(images: [&DynamicImage; 6], format: PixelFormat) -> Result<TextureCubeMap> {
        let size = (images[0].width(), images[0].height());
        for image in &images {
            if image.width() == 0 || image.height() == 0 {
                return Err(Error::Image("cube map face is empty".into()));
            }

            if (image.width(), image.height()) != size {
                return Err(Error::SizeMismatch {
                    expected: size.0 as usize * size.1 as usize,
                    actual: image.width() as usize * image.height() as usize,
                });
            }

            let channels = image.color().channel_count() as usize;
            if channels != format.channels() {
                return Err(Error::ChannelMismatch {
                    expected: format.channels(),
                    actual: channels,
                });
            }
        }

        let faces: Vec<_> = images
            .iter()
            .map(|v| ImageData::from_image(v, false))
            .collect();

        TextureCubeMap::from_faces(&faces, format)
    }

    fn from_faces(faces: &[ImageData], format: PixelFormat) -> Result<TextureCubeMap> {
        let caps = backend::capabilities()?;
        let format = format.normalize();
        let size = (faces[0].width, faces[0].height);
        for face in faces {
            if (face.width, face.height) != size {
                return Err(Error::SizeMismatch {
                    expected: size.0 as usize * size.1 as usize,
                    actual: face.width as usize * face.height as usize,
                });
            }

            format::internal_format(format, face.pixels.kind(), &caps)?;
        }

        let handle = Handle::new()?;
        unsafe {
            gl::BindTexture(gl::TEXTURE_CUBE_MAP, handle.id());
            super::bind_texture_params(
                gl::TEXTURE_CUBE_MAP,
                TextureFilter::Linear,
                TextureWrap::ClampToEdge,
            );
            gl::TexParameteri(
                gl::TEXTURE_CUBE_MAP,
                gl::TEXTURE_WRAP_R,
                gl::CLAMP_TO_EDGE as GLint,
            );

            let unbind = finally(|| gl::BindTexture(gl::TEXTURE_CUBE_MAP, 0));
            for (i, face) in faces.iter().enumerate() {
                upload_face(&caps, gl::TEXTURE_CUBE_MAP_POSITIVE_X + i as GLenum, format, face)?;
            }

            drop(unbind);
            backend::check()?;
        }

        Ok(TextureCubeMap {
            handle,
            size: (faces[0].width, faces[0].height),
            format: Some(format),
        })
    }

    #[inline]
    pub fn bind(&self) {
        unsafe { gl::BindTexture(gl::TEXTURE_CUBE_MAP, self.id()) };
    }

    #[inline]
    pub fn bind_unit(&self, unit: u32) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            gl::BindTexture(gl::TEXTURE_CUBE_MAP, self.id());
        }
    }

    #[inline]
    pub fn unbind(&self) {
        unsafe { gl::BindTexture(gl::TEXTURE_CUBE_MAP, 0) };
    }

    pub fn destroy(&mut self) {
        self.handle.destroy();
        self.size = (0, 0);
        self.format = None;
    }

    #[inline]
    pub fn id(&self) -> GLuint {
        self.handle.id()
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.handle.is_empty()
    }

    /// Dimensions of each face.
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[inline]
    pub fn format(&self) -> Option<PixelFormat> {
        self.format
    }
}

unsafe fn upload_face(caps: &Capabilities, target: GLenum, format: PixelFormat, face: &ImageData) -> Result<()> {
    let pixels = face.pixels.as_pixels();
    let expected = format::expected_len(face.width, face.height, format, pixels.kind());
    let len = pixels.len().unwrap_or(0);
    if len < expected {
        return Err(Error::SizeMismatch {
            expected,
            actual: len,
        });
    }

    gl::TexImage2D(
        target,
        0,
        format::internal_format(format, pixels.kind(), caps)? as GLint,
        face.width as GLsizei,
        face.height as GLsizei,
        0,
        format.transfer_format(caps)?,
        format::transfer_type(format, pixels.kind()),
        pixels.as_ptr(),
    );

    Ok(())
}
