//! Decoding and encoding of image files.

use std::path::Path;

use image::{DynamicImage, GrayAlphaImage, GrayImage, ImageFormat, RgbImage, RgbaImage};

use crate::errors::*;
use crate::texture::format::{PixelFormat, PixelKind, Pixels};

/// Host-side pixels which own their storage.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelBuf {
    U8(Vec<u8>),
    F32(Vec<f32>),
}

impl PixelBuf {
    #[inline]
    pub fn kind(&self) -> PixelKind {
        match *self {
            PixelBuf::U8(_) => PixelKind::U8,
            PixelBuf::F32(_) => PixelKind::F32,
        }
    }

    #[inline]
    pub fn as_pixels(&self) -> Pixels<'_> {
        match *self {
            PixelBuf::U8(ref v) => Pixels::U8(v),
            PixelBuf::F32(ref v) => Pixels::F32(v),
        }
    }
}

/// A decoded image with tightly packed rows.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub channels: usize,
    pub pixels: PixelBuf,
}

impl ImageData {
    /// Flattens `image` into interleaved channels. 16-bits images are converted to 8-bits,
    /// and floating point images keep their precision.
    pub fn from_image(image: &DynamicImage, vertical_flip: bool) -> ImageData {
        let flipped;
        let image = if vertical_flip {
            flipped = image.flipv();
            &flipped
        } else {
            image
        };

        let channels = image.color().channel_count() as usize;
        let (width, height) = (image.width(), image.height());

        let pixels = match *image {
            DynamicImage::ImageRgb32F(ref v) => PixelBuf::F32(v.as_raw().clone()),
            DynamicImage::ImageRgba32F(ref v) => PixelBuf::F32(v.as_raw().clone()),
            _ => match channels {
                1 => PixelBuf::U8(image.to_luma8().into_raw()),
                2 => PixelBuf::U8(image.to_luma_alpha8().into_raw()),
                3 => PixelBuf::U8(image.to_rgb8().into_raw()),
                _ => PixelBuf::U8(image.to_rgba8().into_raw()),
            },
        };

        ImageData {
            width,
            height,
            channels,
            pixels,
        }
    }

    /// The pixel format matches the channels of this image.
    #[inline]
    pub fn format(&self) -> Result<PixelFormat> {
        PixelFormat::from_channels(self.channels)
    }
}

/// Decodes a image file.
pub fn open<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();
    image::open(path).map_err(|err| Error::Image(format!("{}: {}", path.display(), err)))
}

/// Builds a 8-bits image from tightly packed pixels. `channels` must be between 1 and 4.
pub fn from_raw(width: u32, height: u32, channels: usize, data: Vec<u8>) -> Result<DynamicImage> {
    let expected = width as usize * height as usize * channels;
    if data.len() < expected {
        return Err(Error::SizeMismatch {
            expected,
            actual: data.len(),
        });
    }

    let mut data = data;
    data.truncate(expected);

    let mismatch = || Error::Image("failed to construct image buffer".into());
    let image = match channels {
        1 => DynamicImage::ImageLuma8(GrayImage::from_raw(width, height, data).ok_or_else(mismatch)?),
        2 => DynamicImage::ImageLumaA8(
            GrayAlphaImage::from_raw(width, height, data).ok_or_else(mismatch)?,
        ),
        3 => DynamicImage::ImageRgb8(RgbImage::from_raw(width, height, data).ok_or_else(mismatch)?),
        4 => DynamicImage::ImageRgba8(RgbaImage::from_raw(width, height, data).ok_or_else(mismatch)?),
        n => return Err(Error::InvalidFormat(format!("{} channels", n))),
    };

    Ok(image)
}

/// Drops the alpha channel of tightly packed RGBA pixels.
pub fn strip_alpha(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
    }
    rgb
}

/// Writes tightly packed RGB pixels as a PNG file.
pub fn save_rgb_png<P: AsRef<Path>>(
    path: P,
    width: u32,
    height: u32,
    rgb: Vec<u8>,
    vertical_flip: bool,
) -> Result<()> {
    let mut image = from_raw(width, height, 3, rgb)?;
    if vertical_flip {
        image = image.flipv();
    }

    let path = path.as_ref();
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|err| Error::Image(format!("{}: {}", path.display(), err)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten() {
        let mut rgb = RgbImage::new(2, 2);
        rgb.put_pixel(0, 0, image::Rgb([255, 0, 0]));
        rgb.put_pixel(0, 1, image::Rgb([0, 0, 255]));

        let image = DynamicImage::ImageRgb8(rgb);
        let data = ImageData::from_image(&image, false);
        assert_eq!(data.channels, 3);
        assert_eq!(data.format().unwrap(), PixelFormat::Rgb);
        match data.pixels {
            PixelBuf::U8(ref v) => assert_eq!(&v[..3], &[255, 0, 0]),
            _ => panic!(),
        }

        let data = ImageData::from_image(&image, true);
        match data.pixels {
            PixelBuf::U8(ref v) => assert_eq!(&v[..3], &[0, 0, 255]),
            _ => panic!(),
        }

        let pixels = data.pixels.as_pixels();
        assert_eq!(pixels.kind(), PixelKind::U8);
        assert_eq!(pixels.len(), Some(12));
    }

    #[test]
    fn wide_images_are_narrowed() {
        let image = DynamicImage::ImageLuma16(image::ImageBuffer::from_pixel(
            3,
            1,
            image::Luma([65535u16]),
        ));

        let data = ImageData::from_image(&image, false);
        assert_eq!(data.channels, 1);
        assert_eq!(data.pixels, PixelBuf::U8(vec![255, 255, 255]));
    }

    #[test]
    fn raw() {
        assert!(from_raw(2, 2, 3, vec![0; 11]).is_err());
        assert!(from_raw(2, 2, 5, vec![0; 20]).is_err());

        let image = from_raw(2, 1, 4, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
        assert_eq!(image.color().channel_count(), 4);
        assert_eq!(strip_alpha(image.as_bytes()), vec![1, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        save_rgb_png(&path, 1, 2, vec![10, 20, 30, 40, 50, 60], true).unwrap();

        let image = open(&path).unwrap().to_rgb8();
        assert_eq!(image.dimensions(), (1, 2));
        assert_eq!(image.get_pixel(0, 0).0, [40, 50, 60]);
        assert_eq!(image.get_pixel(0, 1).0, [10, 20, 30]);
    }
}
