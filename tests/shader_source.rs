extern crate gloss;
extern crate tempfile;

use std::fs;

use gloss::backend::{Capabilities, Extensions, Version};
use gloss::shader::source::version_directive;
use gloss::shader::*;

const MODERN: &str = "in vec3 position;\nvoid main() { gl_Position = vec4(position, 1.0); }\n";
const LEGACY: &str = "attribute vec3 position;\nvoid main() { gl_Position = vec4(position, 1.0); }\n";

fn caps(version: Version) -> Capabilities {
    Capabilities::with_version(version, Extensions::default())
}

#[test]
fn directives() {
    assert_eq!(version_directive(MODERN, Version::GL(4, 1)), "410");
    assert_eq!(version_directive(MODERN, Version::GL(3, 3)), "330");
    assert_eq!(version_directive(MODERN, Version::GL(4, 6)), "460");
    assert_eq!(version_directive(MODERN, Version::GL(3, 2)), "150");
    assert_eq!(version_directive(MODERN, Version::GL(3, 1)), "140");
    assert_eq!(version_directive(MODERN, Version::GL(3, 0)), "130");
    assert_eq!(version_directive(MODERN, Version::GL(2, 1)), "110");

    assert_eq!(version_directive(MODERN, Version::ES(3, 0)), "300 es");
    assert_eq!(version_directive(MODERN, Version::ES(3, 1)), "310 es");
    assert_eq!(version_directive(MODERN, Version::ES(3, 2)), "320 es");
    assert_eq!(version_directive(MODERN, Version::ES(2, 0)), "100");

    assert_eq!(version_directive(LEGACY, Version::GL(4, 1)), "100");
    assert_eq!(version_directive(LEGACY, Version::ES(3, 0)), "100");
    assert_eq!(version_directive("varying vec2 uv;", Version::GL(3, 3)), "100");
}

#[test]
fn inject() {
    let src = inject_version(MODERN, &caps(Version::GL(4, 1)));
    assert!(src.starts_with("#version 410\n"));
    assert!(src.ends_with(MODERN));

    let src = inject_version(LEGACY, &caps(Version::ES(3, 0)));
    assert!(src.starts_with("#version 100\n"));
}

#[test]
fn declared_version_is_kept() {
    let declared = "#version 330 core\nvoid main() {}\n";
    assert_eq!(inject_version(declared, &caps(Version::ES(3, 0))), declared);

    let indented = "\n  #version 300 es\nvoid main() {}\n";
    assert_eq!(inject_version(indented, &caps(Version::GL(4, 1))), indented);
}

#[test]
fn stage_admission() {
    let gl41 = caps(Version::GL(4, 1));
    assert!(ShaderStage::ALL.iter().all(|v| v.is_supported(&gl41)));

    let gl32 = caps(Version::GL(3, 2));
    assert!(ShaderStage::Geometry.is_supported(&gl32));
    assert!(!ShaderStage::TessControl.is_supported(&gl32));

    let es30 = caps(Version::ES(3, 0));
    assert!(ShaderStage::Vertex.is_supported(&es30));
    assert!(ShaderStage::Fragment.is_supported(&es30));
    assert!(!ShaderStage::Geometry.is_supported(&es30));
    assert!(!ShaderStage::TessEvaluation.is_supported(&es30));
}

#[test]
fn sources() {
    let sources = ShaderSources::new("vs", "fs").with_tessellation("tcs", "tes");
    assert_eq!(sources.get(ShaderStage::Geometry), "");
    assert_eq!(sources.get(ShaderStage::TessEvaluation), "tes");

    let stages: Vec<_> = sources.iter().map(|(stage, _)| stage).collect();
    assert_eq!(
        stages,
        vec![
            ShaderStage::Vertex,
            ShaderStage::Fragment,
            ShaderStage::TessControl,
            ShaderStage::TessEvaluation
        ]
    );
}

#[test]
fn read_files() {
    let dir = tempfile::tempdir().unwrap();
    let vs = dir.path().join("sprite.vs");
    let fs_path = dir.path().join("sprite.fs");
    fs::write(&vs, MODERN).unwrap();
    fs::write(&fs_path, "void main() {}").unwrap();

    let paths = ShaderPaths::new(&vs, &fs_path);
    assert_eq!(paths.get(ShaderStage::Vertex), Some(vs.as_path()));
    assert_eq!(paths.get(ShaderStage::Geometry), None);
    assert_eq!(paths.iter().count(), 2);

    let sources = paths.read().unwrap();
    assert_eq!(sources.get(ShaderStage::Vertex), MODERN);
    assert_eq!(sources.get(ShaderStage::Fragment), "void main() {}");

    let paths = paths.with_geometry(dir.path().join("missing.gs"));
    match paths.read() {
        Err(gloss::errors::Error::Io(msg)) => assert!(msg.contains("missing.gs")),
        _ => panic!(),
    }
}
