//! Viewport layouts and fitting images into a viewport.

use gl;
use gl::types::*;

use crate::errors::*;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    #[inline]
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Viewport {
            x,
            y,
            width,
            height,
        }
    }

    /// Applies this viewport with `glViewport`.
    #[inline]
    pub fn apply(&self) {
        unsafe {
            gl::Viewport(
                self.x as GLint,
                self.y as GLint,
                self.width as GLsizei,
                self.height as GLsizei,
            )
        };
    }
}

/// Ordered list of viewports, usually used to lay out side-by-side views.
#[derive(Debug, Default, Clone)]
pub struct ViewportSwitcher {
    viewports: Vec<Viewport>,
}

impl ViewportSwitcher {
    /// `num` tiles of `width` x `height` placed from the origin.
    pub fn new(width: i32, height: i32, num: usize, horizontal: bool) -> Self {
        ViewportSwitcher::tiled(0, 0, width, height, num, horizontal)
    }

    /// `num` tiles of `width` x `height` placed from (`x`, `y`), left-to-right if
    /// `horizontal` otherwise bottom-to-top.
    pub fn tiled(x: i32, y: i32, width: i32, height: i32, num: usize, horizontal: bool) -> Self {
        let mut switcher = ViewportSwitcher::default();
        for i in 0..num as i32 {
            if horizontal {
                switcher.push(x + i * width, y, width, height);
            } else {
                switcher.push(x, y + i * height, width, height);
            }
        }

        switcher
    }

    #[inline]
    pub fn push(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.viewports.push(Viewport::new(x, y, width, height));
    }

    pub fn get(&self, index: usize) -> Result<&Viewport> {
        self.viewports.get(index).ok_or(Error::OutOfBounds)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.viewports.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.viewports.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> ::std::slice::Iter<'_, Viewport> {
        self.viewports.iter()
    }

    /// Applies viewport `index`, returns false if there is no such viewport.
    pub fn switch_to(&self, index: usize) -> bool {
        match self.viewports.get(index) {
            Some(v) => {
                v.apply();
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ViewportMatchMode {
    /// The whole image is visible, the viewport is letterboxed.
    NonFullscreen,
    /// The image covers the viewport, some pixels are cropped.
    Fullscreen,
}

impl Default for ViewportMatchMode {
    fn default() -> Self {
        ViewportMatchMode::NonFullscreen
    }
}

/// Computes the viewport that shows a `image_width` x `image_height` image inside a
/// `viewport_width` x `viewport_height` viewport while keeping the aspect ratio of the image.
pub fn compute_viewport_by_match_image(
    viewport_width: i32,
    viewport_height: i32,
    image_width: i32,
    image_height: i32,
    mode: ViewportMatchMode,
) -> Viewport {
    if image_width == 0 || image_height == 0 {
        return Viewport::new(0, 0, viewport_width, viewport_height);
    }

    let viewport_ratio = viewport_height as f32 / viewport_width as f32;
    let image_ratio = image_height as f32 / image_width as f32;

    let fit_width = || {
        let height = (viewport_width as f32 * image_ratio) as i32;
        Viewport::new(0, (viewport_height - height) / 2, viewport_width, height)
    };

    let fit_height = || {
        let width = (viewport_height as f32 / image_ratio) as i32;
        Viewport::new((viewport_width - width) / 2, 0, width, viewport_height)
    };

    match mode {
        ViewportMatchMode::NonFullscreen if viewport_ratio > image_ratio => fit_width(),
        ViewportMatchMode::NonFullscreen => fit_height(),
        ViewportMatchMode::Fullscreen if viewport_ratio > image_ratio => fit_height(),
        ViewportMatchMode::Fullscreen => fit_width(),
    }
}
