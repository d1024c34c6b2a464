use std::cmp;
use std::fs;
use std::path::{Path, PathBuf};

use gl;
use gl::types::*;

use crate::backend::{Capabilities, Version};
use crate::errors::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
    TessControl,
    TessEvaluation,
}

impl ShaderStage {
    pub const ALL: [ShaderStage; 5] = [
        ShaderStage::Vertex,
        ShaderStage::Fragment,
        ShaderStage::Geometry,
        ShaderStage::TessControl,
        ShaderStage::TessEvaluation,
    ];

    /// Returns true if programs of current context could include this stage.
    pub fn is_supported(self, caps: &Capabilities) -> bool {
        match self {
            ShaderStage::Vertex | ShaderStage::Fragment => true,
            ShaderStage::Geometry => caps.supports_geometry_stage(),
            ShaderStage::TessControl | ShaderStage::TessEvaluation => caps.supports_tessellation_stages(),
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

impl From<ShaderStage> for GLenum {
    fn from(stage: ShaderStage) -> Self {
        match stage {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
            ShaderStage::Geometry => gl::GEOMETRY_SHADER,
            ShaderStage::TessControl => gl::TESS_CONTROL_SHADER,
            ShaderStage::TessEvaluation => gl::TESS_EVALUATION_SHADER,
        }
    }
}

/// GLSL sources of each stage, empty sources are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSources {
    sources: [String; 5],
}

impl ShaderSources {
    pub fn new<S1: Into<String>, S2: Into<String>>(vertex: S1, fragment: S2) -> Self {
        ShaderSources::default()
            .with(ShaderStage::Vertex, vertex)
            .with(ShaderStage::Fragment, fragment)
    }

    pub fn with<S: Into<String>>(mut self, stage: ShaderStage, src: S) -> Self {
        self.sources[stage.index()] = src.into();
        self
    }

    #[inline]
    pub fn with_geometry<S: Into<String>>(self, src: S) -> Self {
        self.with(ShaderStage::Geometry, src)
    }

    #[inline]
    pub fn with_tessellation<S1: Into<String>, S2: Into<String>>(self, control: S1, evaluation: S2) -> Self {
        self.with(ShaderStage::TessControl, control)
            .with(ShaderStage::TessEvaluation, evaluation)
    }

    #[inline]
    pub fn get(&self, stage: ShaderStage) -> &str {
        &self.sources[stage.index()]
    }

    /// Iterates over the non-empty stages.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = (ShaderStage, &'a str)> + 'a {
        (0..ShaderStage::ALL.len())
            .map(move |i| (ShaderStage::ALL[i], self.sources[i].as_str()))
            .filter(|(_, src)| !src.is_empty())
    }
}

/// Files holding the GLSL sources of each stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderPaths {
    paths: [Option<PathBuf>; 5],
}

impl ShaderPaths {
    pub fn new<P1: Into<PathBuf>, P2: Into<PathBuf>>(vertex: P1, fragment: P2) -> Self {
        ShaderPaths::default()
            .with(ShaderStage::Vertex, vertex)
            .with(ShaderStage::Fragment, fragment)
    }

    pub fn with<P: Into<PathBuf>>(mut self, stage: ShaderStage, path: P) -> Self {
        self.paths[stage.index()] = Some(path.into());
        self
    }

    #[inline]
    pub fn with_geometry<P: Into<PathBuf>>(self, path: P) -> Self {
        self.with(ShaderStage::Geometry, path)
    }

    #[inline]
    pub fn with_tessellation<P1: Into<PathBuf>, P2: Into<PathBuf>>(self, control: P1, evaluation: P2) -> Self {
        self.with(ShaderStage::TessControl, control)
            .with(ShaderStage::TessEvaluation, evaluation)
    }

    #[inline]
    pub fn get(&self, stage: ShaderStage) -> Option<&Path> {
        self.paths[stage.index()].as_ref().map(|v| v.as_path())
    }

    pub fn iter<'a>(&'a self) -> impl Iterator<Item = (ShaderStage, &'a Path)> + 'a {
        (0..ShaderStage::ALL.len()).filter_map(move |i| {
            self.paths[i]
                .as_ref()
                .map(|v| (ShaderStage::ALL[i], v.as_path()))
        })
    }

    /// Reads every file entirely.
    pub fn read(&self) -> Result<ShaderSources> {
        let mut sources = ShaderSources::default();
        for (stage, path) in self.iter() {
            let src = fs::read_to_string(path)
                .map_err(|err| Error::Io(format!("{}: {}", path.display(), err)))?;
            sources = sources.with(stage, src);
        }

        Ok(sources)
    }
}

/// Prepends a `#version` directive that matches current context, unless `src` already
/// declares one.
pub fn inject_version(src: &str, caps: &Capabilities) -> String {
    if src.trim_start().starts_with("#version") {
        return src.to_owned();
    }

    format!("#version {}\n{}", version_directive(src, caps.version), src)
}

/// Sources written with `attribute` and `varying` are treated as GLSL ES 1.00.
pub fn version_directive(src: &str, version: Version) -> String {
    if src.contains("varying") || src.contains("attribute") {
        return "100".into();
    }

    match version {
        Version::ES(3, 0) => "300 es".into(),
        Version::ES(3, minor) => format!("3{}0 es", cmp::min(minor, 2)),
        Version::ES(major, _) if major > 3 => "320 es".into(),
        Version::ES(_, _) => "100".into(),
        Version::GL(major, minor) if (major, minor) >= (3, 3) => {
            format!("{}", u32::from(major) * 100 + u32::from(minor) * 10)
        }
        Version::GL(3, 2) => "150".into(),
        Version::GL(3, 1) => "140".into(),
        Version::GL(3, 0) => "130".into(),
        Version::GL(_, _) => "110".into(),
    }
}
