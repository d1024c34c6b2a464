//! The driver layer: function loading, context capabilities, owned object names and
//! error reporting.

pub mod capabilities;
pub mod debug;
pub mod handle;
pub mod types;

pub use self::capabilities::{Capabilities, Extensions, Profile, Version};
pub use self::handle::{Handle, HandleKind};
pub use self::types::{BufferUsage, ScalarType, TextureFilter, TextureWrap};

use std::os::raw::c_void;
use std::sync::{Arc, RwLock};

use gl;
use gl::types::*;

use crate::errors::*;
use crate::settings::Settings;

struct Context {
    capabilities: Arc<Capabilities>,
    settings: Arc<Settings>,
}

lazy_static! {
    static ref CONTEXT: RwLock<Option<Context>> = RwLock::new(None);
}

/// Loads the GL function pointers with `loader`, parses the capabilities of the current
/// context and applies `settings`. Must be called from the thread which owns the context.
pub fn load_with<F>(loader: F, settings: Settings) -> Result<Arc<Capabilities>>
where
    F: FnMut(&'static str) -> *const c_void,
{
    gl::load_with(loader);

    let capabilities = unsafe { Capabilities::parse()? };
    info!("OpenGL {:#?}", capabilities);
    capabilities.validate()?;

    unsafe {
        gl::PixelStorei(gl::PACK_ALIGNMENT, settings.pack_alignment);
        gl::PixelStorei(gl::UNPACK_ALIGNMENT, settings.unpack_alignment);
        check()?;
    }

    if settings.debug_output && !debug::enable_debug_output(&capabilities, settings.synchronous_debug_output) {
        warn!("Debug output is not supported by {:?}.", capabilities.version);
    }

    Ok(install(capabilities, settings))
}

/// Installs capabilities and settings without touching the driver.
pub fn install(capabilities: Capabilities, settings: Settings) -> Arc<Capabilities> {
    let capabilities = Arc::new(capabilities);
    let context = Context {
        capabilities: capabilities.clone(),
        settings: Arc::new(settings),
    };

    match CONTEXT.write() {
        Ok(mut v) => *v = Some(context),
        Err(poisoned) => *poisoned.into_inner() = Some(context),
    }

    capabilities
}

/// Returns the capabilities of the loaded context.
pub fn capabilities() -> Result<Arc<Capabilities>> {
    let context = CONTEXT.read().map_err(|_| Error::NotInitialized)?;
    context
        .as_ref()
        .map(|v| v.capabilities.clone())
        .ok_or(Error::NotInitialized)
}

/// Returns the settings of the loaded context, or the defaults if nothing has been
/// loaded yet.
pub fn settings() -> Arc<Settings> {
    CONTEXT
        .read()
        .ok()
        .and_then(|v| v.as_ref().map(|v| v.settings.clone()))
        .unwrap_or_default()
}

/// Drains the error flag of the driver.
pub unsafe fn check() -> Result<()> {
    match gl::GetError() {
        gl::NO_ERROR => Ok(()),
        err => Err(Error::Driver(describe_error(err).to_owned())),
    }
}

pub fn describe_error(err: GLenum) -> &'static str {
    match err {
        gl::NO_ERROR => "No error has been recorded.",
        gl::INVALID_ENUM => "An unacceptable value is specified for an enumerated argument.",
        gl::INVALID_VALUE => "A numeric argument is out of range.",
        gl::INVALID_OPERATION => "The specified operation is not allowed in the current state.",
        gl::INVALID_FRAMEBUFFER_OPERATION => {
            "The command is trying to render to or read from the framebuffer while the \
             currently bound framebuffer is not framebuffer complete."
        }
        gl::OUT_OF_MEMORY => "There is not enough memory left to execute the command.",
        _ => "Oops, Unknown OpenGL error.",
    }
}

/// Checks the completeness of the framebuffer bound to `GL_FRAMEBUFFER`.
pub unsafe fn check_framebuffer_status() -> Result<()> {
    framebuffer_status(gl::CheckFramebufferStatus(gl::FRAMEBUFFER))
}

pub fn framebuffer_status(status: GLenum) -> Result<()> {
    let reason = match status {
        gl::FRAMEBUFFER_COMPLETE => return Ok(()),
        gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => {
            "Not all framebuffer attachment points are framebuffer attachment complete."
        }
        gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => {
            "No images are attached to the framebuffer."
        }
        gl::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => {
            "A draw buffer names a attachment point without any image attached."
        }
        gl::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => {
            "The read buffer names a attachment point without any image attached."
        }
        gl::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => {
            "The attached images do not have the same number of samples."
        }
        gl::FRAMEBUFFER_UNSUPPORTED => {
            "The combination of internal formats of the attached images violates an \
             implementation-dependent set of restrictions."
        }
        _ => "Unknown status.",
    };

    Err(Error::FramebufferIncomplete(format!("{} ({:#x})", reason, status)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status() {
        assert!(framebuffer_status(gl::FRAMEBUFFER_COMPLETE).is_ok());

        match framebuffer_status(gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT) {
            Err(Error::FramebufferIncomplete(reason)) => {
                assert!(reason.starts_with("No images are attached"))
            }
            _ => panic!(),
        }
    }
}
