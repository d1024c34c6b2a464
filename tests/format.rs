extern crate gl;
extern crate gloss;

use gloss::backend::{Capabilities, Extensions, Version};
use gloss::errors::Error;
use gloss::texture::format::*;

fn desktop() -> Capabilities {
    Capabilities::with_version(Version::GL(4, 1), Extensions::default())
}

fn embedded() -> Capabilities {
    Capabilities::with_version(Version::ES(3, 0), Extensions::default())
}

#[test]
fn internal_formats() {
    let caps = desktop();
    assert_eq!(internal_format(PixelFormat::Red, PixelKind::U8, &caps).unwrap(), gl::R8);
    assert_eq!(internal_format(PixelFormat::Luminance, PixelKind::U8, &caps).unwrap(), gl::R8);
    assert_eq!(internal_format(PixelFormat::Rg, PixelKind::F32, &caps).unwrap(), gl::RG32F);
    assert_eq!(internal_format(PixelFormat::Rgb, PixelKind::U8, &caps).unwrap(), gl::RGB8);
    assert_eq!(internal_format(PixelFormat::Rgba, PixelKind::F32, &caps).unwrap(), gl::RGBA32F);
    assert_eq!(internal_format(PixelFormat::Bgra, PixelKind::U8, &caps).unwrap(), gl::RGBA);
    assert_eq!(
        internal_format(PixelFormat::Depth, PixelKind::F32, &caps).unwrap(),
        gl::DEPTH_COMPONENT32F
    );

    assert!(internal_format(PixelFormat::Green, PixelKind::U8, &caps).is_err());
}

#[test]
fn bgr_is_desktop_only() {
    let caps = embedded();

    match internal_format(PixelFormat::Bgr, PixelKind::U8, &caps) {
        Err(Error::InvalidFormat(_)) => {}
        _ => panic!(),
    }

    assert!(PixelFormat::Bgra.transfer_format(&caps).is_err());
    assert_eq!(PixelFormat::Bgra.transfer_format(&desktop()).unwrap(), gl::BGRA);
}

#[test]
fn transfer_formats() {
    let caps = embedded();
    assert_eq!(PixelFormat::Luminance.transfer_format(&caps).unwrap(), gl::RED);
    assert_eq!(PixelFormat::Rgb.transfer_format(&caps).unwrap(), gl::RGB);
    assert_eq!(PixelFormat::Depth.transfer_format(&caps).unwrap(), gl::DEPTH_COMPONENT);

    assert_eq!(transfer_type(PixelFormat::Rgba, PixelKind::U8), gl::UNSIGNED_BYTE);
    assert_eq!(transfer_type(PixelFormat::Rgba, PixelKind::F32), gl::FLOAT);
    assert_eq!(transfer_type(PixelFormat::Depth, PixelKind::U8), gl::UNSIGNED_INT);
}

#[test]
fn channels() {
    assert_eq!(PixelFormat::Luminance.channels(), 1);
    assert_eq!(PixelFormat::Bgr.channels(), 3);
    assert_eq!(PixelFormat::Bgra.channels(), 4);
    assert!(!PixelFormat::Depth.is_color());

    assert_eq!(PixelFormat::from_channels(2).unwrap(), PixelFormat::Rg);
    assert_eq!(PixelFormat::from_channels(4).unwrap(), PixelFormat::Rgba);
    assert!(PixelFormat::from_channels(5).is_err());
}

#[test]
fn lengths() {
    assert_eq!(expected_len(4, 2, PixelFormat::Rgb, PixelKind::U8), 24);
    assert_eq!(expected_len(4, 2, PixelFormat::Rgba, PixelKind::F32), 32);
    assert_eq!(expected_len(4, 2, PixelFormat::Depth, PixelKind::U8), 32);
    assert_eq!(expected_len(4, 2, PixelFormat::Depth, PixelKind::F32), 8);

    let data = [0u8; 12];
    let pixels = Pixels::U8(&data);
    assert_eq!(pixels.kind(), PixelKind::U8);
    assert_eq!(pixels.len(), Some(12));
    assert_eq!(Pixels::Alloc(PixelKind::F32).len(), None);

    let mut data = [0f32; 3];
    let pixels = PixelsMut::F32(&mut data);
    assert_eq!(pixels.kind(), PixelKind::F32);
    assert_eq!(pixels.len(), 3);
}
