use std::collections::HashMap;
use std::ffi::CString;

use gl;
use gl::types::*;
use smallvec::SmallVec;

use crate::backend::handle::{Handle, ProgramObject};
use crate::backend::{self, Capabilities};
use crate::errors::*;

use super::source::{self, ShaderSources, ShaderStage};

/// Compiles every supported stage of `sources` and links them into a new program. Stage
/// objects never outlive this function.
pub fn build(
    sources: &ShaderSources,
    attributes: &[(String, u32)],
    caps: &Capabilities,
) -> Result<Handle<ProgramObject>> {
    let program = Handle::<ProgramObject>::new()?;
    let mut shaders = SmallVec::<[GLuint; 5]>::new();

    let res = unsafe {
        let mut res = Ok(());
        for (stage, src) in sources.iter() {
            if !stage.is_supported(caps) {
                debug!("Skipped {:?} stage which is not supported by {:?}.", stage, caps.version);
                continue;
            }

            match compile(stage, &source::inject_version(src, caps)) {
                Ok(v) => shaders.push(v),
                Err(err) => {
                    res = Err(err);
                    break;
                }
            }
        }

        let res = res.and_then(|_| link(program.id(), &shaders, attributes));
        for &v in &shaders {
            gl::DeleteShader(v);
        }

        res
    };

    res?;
    Ok(program)
}

unsafe fn compile(stage: ShaderStage, src: &str) -> Result<GLuint> {
    let c_str = CString::new(src.as_bytes()).map_err(|_| Error::ShaderCompile {
        stage,
        log: "source contains a nul character".into(),
    })?;

    let shader = gl::CreateShader(stage.into());
    if shader == 0 {
        return Err(Error::Allocation("Shader"));
    }

    gl::ShaderSource(shader, 1, &c_str.as_ptr(), ::std::ptr::null());
    gl::CompileShader(shader);

    let mut status = GLint::from(gl::FALSE);
    gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);

    if status != GLint::from(gl::TRUE) {
        let mut len = 0;
        gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
        let log = info_log(len, |len, written, buf| gl::GetShaderInfoLog(shader, len, written, buf));
        gl::DeleteShader(shader);

        error!("Failed to compile {:?} shader:\n{}", stage, log);
        return Err(Error::ShaderCompile { stage, log });
    }

    Ok(shader)
}

unsafe fn link(program: GLuint, shaders: &[GLuint], attributes: &[(String, u32)]) -> Result<()> {
    for &v in shaders {
        gl::AttachShader(program, v);
    }

    for (name, location) in attributes {
        if let Ok(c_str) = CString::new(name.as_bytes()) {
            gl::BindAttribLocation(program, *location, c_str.as_ptr());
        }
    }

    gl::LinkProgram(program);

    for &v in shaders {
        gl::DetachShader(program, v);
    }

    let mut status = GLint::from(gl::FALSE);
    gl::GetProgramiv(program, gl::LINK_STATUS, &mut status);

    if status != GLint::from(gl::TRUE) {
        let mut len = 0;
        gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
        let log = info_log(len, |len, written, buf| gl::GetProgramInfoLog(program, len, written, buf));

        error!("Failed to link program {}:\n{}", program, log);
        return Err(Error::ShaderLink(log));
    }

    backend::check()
}

unsafe fn info_log<F>(len: GLint, func: F) -> String
where
    F: FnOnce(GLsizei, *mut GLsizei, *mut GLchar),
{
    if len <= 0 {
        return String::new();
    }

    let mut buf = vec![0u8; len as usize];
    let mut written = 0;
    func(len, &mut written, buf.as_mut_ptr() as *mut GLchar);
    buf.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Assigns texture units to sampler uniforms. A name keeps its unit until `clear`.
#[derive(Debug, Default, Clone)]
pub struct TextureUnits {
    units: HashMap<String, u32>,
    next: u32,
}

impl TextureUnits {
    /// Returns the unit of `name`, claiming the next free one on first use.
    pub fn claim(&mut self, name: &str, max: u32) -> Result<u32> {
        if let Some(&unit) = self.units.get(name) {
            return Ok(unit);
        }

        if self.next >= max {
            return Err(Error::OutOfBounds);
        }

        let unit = self.next;
        self.next += 1;
        self.units.insert(name.to_owned(), unit);
        Ok(unit)
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<u32> {
        self.units.get(name).cloned()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn clear(&mut self) {
        self.units.clear();
        self.next = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_are_stable() {
        let mut units = TextureUnits::default();
        assert_eq!(units.claim("u_albedo", 16).unwrap(), 0);
        assert_eq!(units.claim("u_normal", 16).unwrap(), 1);
        assert_eq!(units.claim("u_albedo", 16).unwrap(), 0);
        assert_eq!(units.get("u_normal"), Some(1));
        assert_eq!(units.get("u_missing"), None);
        assert_eq!(units.len(), 2);

        units.clear();
        assert!(units.is_empty());
        assert_eq!(units.claim("u_normal", 16).unwrap(), 0);
    }

    #[test]
    fn units_are_limited() {
        let mut units = TextureUnits::default();
        assert!(units.claim("a", 2).is_ok());
        assert!(units.claim("b", 2).is_ok());
        assert!(units.claim("c", 2).is_err());
        assert_eq!(units.claim("a", 2).unwrap(), 0);
    }
}
