extern crate gloss;

use gloss::backend::{Capabilities, Extensions, Version};
use gloss::errors::Error;

#[test]
fn parse_version() {
    assert_eq!(Version::parse_str("4.1 Metal - 76.3").unwrap(), Version::GL(4, 1));
    assert_eq!(Version::parse_str("3.3.0 NVIDIA 440.00").unwrap(), Version::GL(3, 3));
    assert_eq!(Version::parse_str("OpenGL ES 3.2 NVIDIA 440.00").unwrap(), Version::ES(3, 2));
    assert_eq!(Version::parse_str("OpenGL ES-CM 1.1").unwrap(), Version::ES(1, 1));

    assert!(Version::parse_str("").is_err());
    assert!(Version::parse_str("four.one").is_err());
    assert!(Version::parse_str("OpenGL ES 3").is_err());
}

#[test]
fn compare_versions() {
    assert!(Version::GL(4, 1) > Version::GL(3, 3));
    assert!(Version::ES(3, 0) >= Version::ES(3, 0));
    assert!(!(Version::GL(3, 0) >= Version::ES(3, 0)));
    assert!(!(Version::ES(3, 0) >= Version::GL(3, 0)));
    assert!(Version::ES(2, 0).is_es());
}

#[test]
fn extensions() {
    let exts = Extensions::from_names(vec!["GL_KHR_debug", "GL_ARB_copy_image", "GL_FOO_bar"]);
    assert!(exts.gl_khr_debug);
    assert!(exts.gl_arb_copy_image);
    assert!(!exts.gl_arb_framebuffer_object);
}

#[test]
fn desktop() {
    let caps = Capabilities::with_version(Version::GL(4, 1), Extensions::default());
    assert!(caps.validate().is_ok());
    assert!(!caps.is_es());
    assert!(caps.supports_multisample_texture());
    assert!(!caps.supports_multisample_storage());
    assert!(caps.supports_geometry_stage());
    assert!(caps.supports_tessellation_stages());
    assert!(caps.supports_get_tex_image());
    assert!(!caps.supports_copy_image());
    assert!(!caps.supports_shader_storage_buffer());
    assert!(!caps.supports_debug_output());
    assert!(caps.supports_bgr_formats());
    assert!(caps.supports_double_vertex_attribs());
    assert!(caps.supports_rgb_read_back());
    assert!(!caps.prefers_integer_depth());
    assert_eq!(caps.max_color_attachments, 8);

    let exts = Extensions::from_names(vec!["GL_KHR_debug", "GL_ARB_copy_image"]);
    let caps = Capabilities::with_version(Version::GL(4, 1), exts);
    assert!(caps.supports_debug_output());
    assert!(caps.supports_copy_image());

    let caps = Capabilities::with_version(Version::GL(4, 3), Extensions::default());
    assert!(caps.supports_shader_storage_buffer());
    assert!(caps.supports_debug_output());
}

#[test]
fn embedded() {
    let caps = Capabilities::with_version(Version::ES(3, 0), Extensions::default());
    assert!(caps.validate().is_ok());
    assert!(caps.is_es());
    assert!(!caps.supports_multisample_texture());
    assert!(!caps.supports_geometry_stage());
    assert!(!caps.supports_get_tex_image());
    assert!(!caps.supports_bgr_formats());
    assert!(caps.supports_integer_vertex_attribs());
    assert!(!caps.supports_double_vertex_attribs());
    assert!(!caps.supports_rgb_read_back());
    assert!(caps.prefers_integer_depth());
    assert!(caps.prefers_half_float_color());
    assert_eq!(caps.max_color_attachments, 4);

    let exts = Extensions::from_names(vec!["GL_EXT_color_buffer_float"]);
    let caps = Capabilities::with_version(Version::ES(3, 0), exts);
    assert!(!caps.prefers_half_float_color());

    let caps = Capabilities::with_version(Version::ES(3, 1), Extensions::default());
    assert!(caps.supports_multisample_texture());
    assert!(caps.supports_multisample_storage());
    assert!(caps.supports_shader_storage_buffer());
}

#[test]
fn requirements() {
    let caps = Capabilities::with_version(Version::GL(2, 1), Extensions::default());
    match caps.validate() {
        Err(Error::Requirement(_)) => {}
        _ => panic!(),
    }

    let exts = Extensions::from_names(vec![
        "GL_ARB_framebuffer_object",
        "GL_ARB_uniform_buffer_object",
        "GL_APPLE_vertex_array_object",
    ]);
    let caps = Capabilities::with_version(Version::GL(2, 1), exts);
    assert!(caps.validate().is_ok());

    let caps = Capabilities::with_version(Version::ES(2, 0), Extensions::default());
    assert!(caps.validate().is_err());
}
