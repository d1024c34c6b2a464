//! Driver debug messages, forwarded into `log`.

use std::ffi;
use std::os::raw::c_void;
use std::ptr;

use gl;
use gl::types::*;
use log::Level;

use super::capabilities::Capabilities;

pub fn describe_source(source: GLenum) -> &'static str {
    match source {
        gl::DEBUG_SOURCE_API => "API",
        gl::DEBUG_SOURCE_WINDOW_SYSTEM => "WINDOW SYSTEM",
        gl::DEBUG_SOURCE_SHADER_COMPILER => "SHADER COMPILER",
        gl::DEBUG_SOURCE_THIRD_PARTY => "THIRD PARTY",
        gl::DEBUG_SOURCE_APPLICATION => "APPLICATION",
        _ => "UNKNOWN",
    }
}

pub fn describe_type(tp: GLenum) -> &'static str {
    match tp {
        gl::DEBUG_TYPE_ERROR => "ERROR",
        gl::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "DEPRECATED BEHAVIOR",
        gl::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "UNDEFINED BEHAVIOR",
        gl::DEBUG_TYPE_PORTABILITY => "PORTABILITY",
        gl::DEBUG_TYPE_PERFORMANCE => "PERFORMANCE",
        gl::DEBUG_TYPE_OTHER => "OTHER",
        gl::DEBUG_TYPE_MARKER => "MARKER",
        _ => "UNKNOWN",
    }
}

pub fn describe_severity(severity: GLenum) -> &'static str {
    match severity {
        gl::DEBUG_SEVERITY_HIGH => "HIGH",
        gl::DEBUG_SEVERITY_MEDIUM => "MEDIUM",
        gl::DEBUG_SEVERITY_LOW => "LOW",
        gl::DEBUG_SEVERITY_NOTIFICATION => "NOTIFICATION",
        _ => "UNKNOWN",
    }
}

/// Returns the log level of a message, or `None` if it should be suppressed.
pub fn report_level(tp: GLenum, severity: GLenum) -> Option<Level> {
    match (tp, severity) {
        (gl::DEBUG_TYPE_OTHER, gl::DEBUG_SEVERITY_NOTIFICATION) => None,
        (gl::DEBUG_TYPE_PERFORMANCE, gl::DEBUG_SEVERITY_MEDIUM) => None,
        (_, gl::DEBUG_SEVERITY_HIGH) => Some(Level::Error),
        (_, gl::DEBUG_SEVERITY_MEDIUM) | (_, gl::DEBUG_SEVERITY_LOW) => Some(Level::Warn),
        _ => Some(Level::Info),
    }
}

/// Names of the source, type and severity of a debug message.
#[inline]
pub fn describe(source: GLenum, tp: GLenum, severity: GLenum) -> (&'static str, &'static str, &'static str) {
    (describe_source(source), describe_type(tp), describe_severity(severity))
}

pub fn format_message(source: GLenum, tp: GLenum, id: GLuint, severity: GLenum, msg: &str) -> String {
    let (source, tp, severity) = describe(source, tp, severity);
    format!(
        "OpenGL [{}]: {} of {} severity, raised from {}: {}",
        id, tp, severity, source, msg
    )
}

extern "system" fn callback(
    source: GLenum,
    tp: GLenum,
    id: GLuint,
    severity: GLenum,
    length: GLsizei,
    msg: *const GLchar,
    _: *mut c_void,
) {
    let level = match report_level(tp, severity) {
        Some(level) => level,
        None => return,
    };

    let msg = if msg.is_null() {
        String::new()
    } else if length >= 0 {
        let bytes = unsafe { ::std::slice::from_raw_parts(msg as *const u8, length as usize) };
        String::from_utf8_lossy(bytes).into_owned()
    } else {
        unsafe { ffi::CStr::from_ptr(msg) }.to_string_lossy().into_owned()
    };

    log!(level, "{}", format_message(source, tp, id, severity, msg.trim_end()));
}

/// Installs the debug message callback. Returns false if the context does not
/// support debug output.
pub fn enable_debug_output(caps: &Capabilities, synchronous: bool) -> bool {
    if !caps.supports_debug_output() {
        return false;
    }

    unsafe {
        gl::Enable(gl::DEBUG_OUTPUT);
        if synchronous {
            gl::Enable(gl::DEBUG_OUTPUT_SYNCHRONOUS);
        } else {
            gl::Disable(gl::DEBUG_OUTPUT_SYNCHRONOUS);
        }

        gl::DebugMessageCallback(Some(callback), ptr::null());
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppressed() {
        assert_eq!(
            report_level(gl::DEBUG_TYPE_OTHER, gl::DEBUG_SEVERITY_NOTIFICATION),
            None
        );
        assert_eq!(
            report_level(gl::DEBUG_TYPE_PERFORMANCE, gl::DEBUG_SEVERITY_MEDIUM),
            None
        );
        assert_eq!(
            report_level(gl::DEBUG_TYPE_PERFORMANCE, gl::DEBUG_SEVERITY_HIGH),
            Some(Level::Error)
        );
        assert_eq!(
            report_level(gl::DEBUG_TYPE_ERROR, gl::DEBUG_SEVERITY_LOW),
            Some(Level::Warn)
        );
        assert_eq!(
            report_level(gl::DEBUG_TYPE_MARKER, gl::DEBUG_SEVERITY_NOTIFICATION),
            Some(Level::Info)
        );
    }

    #[test]
    fn message() {
        let msg = format_message(
            gl::DEBUG_SOURCE_SHADER_COMPILER,
            gl::DEBUG_TYPE_UNDEFINED_BEHAVIOR,
            7,
            gl::DEBUG_SEVERITY_HIGH,
            "oops",
        );

        assert_eq!(
            msg,
            "OpenGL [7]: UNDEFINED BEHAVIOR of HIGH severity, raised from SHADER COMPILER: oops"
        );

        assert_eq!(describe_source(gl::DEBUG_SOURCE_OTHER), "UNKNOWN");
        assert_eq!(describe_type(0), "UNKNOWN");
        assert_eq!(describe_severity(0), "UNKNOWN");
    }
}
