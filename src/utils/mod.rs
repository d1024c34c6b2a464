//! Commonly used utilities.

pub mod finally;
pub mod image;

pub use self::finally::{finally, FinallyGuard};
pub use self::image::{ImageData, PixelBuf};
