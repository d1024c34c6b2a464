use std::cmp;
use std::ffi;

use gl;
use gl::types::*;

use crate::errors::*;

/// Describes the OpenGL context profile.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Profile {
    /// The context uses only future-compatible functions and definitions.
    Core,
    /// The context includes all immediate mode functions and definitions.
    Compatibility,
}

/// Describes a version.
///
/// A version can only be compared to another version if they belong to the same API.
/// For example, both `Version::GL(3, 0) >= Version::ES(3, 0)` and `Version::ES(3, 0) >=
/// Version::GL(3, 0)` return `false`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Version {
    /// Regular OpenGL.
    GL(u8, u8),
    /// OpenGL embedded system.
    ES(u8, u8),
}

impl PartialOrd for Version {
    #[inline]
    fn partial_cmp(&self, other: &Version) -> Option<cmp::Ordering> {
        let (es1, major1, minor1) = match *self {
            Version::GL(major, minor) => (false, major, minor),
            Version::ES(major, minor) => (true, major, minor),
        };

        let (es2, major2, minor2) = match *other {
            Version::GL(major, minor) => (false, major, minor),
            Version::ES(major, minor) => (true, major, minor),
        };

        if es1 != es2 {
            None
        } else {
            match major1.cmp(&major2) {
                cmp::Ordering::Equal => Some(minor1.cmp(&minor2)),
                v => Some(v),
            }
        }
    }
}

impl Version {
    /// Obtains the OpenGL version of the current context using the loaded functions.
    ///
    /// # Unsafe
    ///
    /// You must ensure that the functions belong to the current context, otherwise you will get
    /// an undefined behavior.
    pub unsafe fn parse() -> Result<Version> {
        Version::parse_str(&parse_gl_str(gl::VERSION)?)
    }

    /// Parses the string returned by `glGetString(GL_VERSION)`, e.g. "4.1 Metal - 76.3" or
    /// "OpenGL ES 3.2 NVIDIA 440.00".
    pub fn parse_str(desc: &str) -> Result<Version> {
        let (es, desc) = if desc.starts_with("OpenGL ES ") {
            (true, &desc[10..])
        } else if desc.starts_with("OpenGL ES-") && desc.len() > 13 {
            (true, &desc[13..])
        } else {
            (false, desc)
        };

        let malformed = || Error::Driver(format!("Version string '{}' is malformed.", desc));

        let desc = desc.split(' ').next().ok_or_else(malformed)?;
        let mut iter = desc.split('.');
        let major = iter
            .next()
            .and_then(|v| v.parse().ok())
            .ok_or_else(malformed)?;
        let minor = iter
            .next()
            .and_then(|v| v.parse().ok())
            .ok_or_else(malformed)?;

        if es {
            Ok(Version::ES(major, minor))
        } else {
            Ok(Version::GL(major, minor))
        }
    }

    #[inline]
    pub fn is_es(self) -> bool {
        match self {
            Version::ES(_, _) => true,
            Version::GL(_, _) => false,
        }
    }
}

macro_rules! extensions {
    ($($string:expr => $field:ident,)+) => {
        /// Contains data about the list of extensions.
        #[derive(Debug, Clone, Copy, Default)]
        pub struct Extensions {
            $(
                pub $field: bool,
            )+
        }

        impl Extensions {
            /// Returns the list of extensions supported by the backend.
            ///
            /// *Safety*: the OpenGL context corresponding to `gl` must be current in the thread.
            pub unsafe fn parse(version: Version) -> Result<Extensions> {
                let strings: Vec<String> = if version >= Version::GL(3, 0) || version >= Version::ES(3, 0) {
                    let mut num_extensions = 0;
                    gl::GetIntegerv(gl::NUM_EXTENSIONS, &mut num_extensions);

                    let mut strings = Vec::with_capacity(num_extensions.max(0) as usize);
                    for i in 0..num_extensions.max(0) {
                        let ext = gl::GetStringi(gl::EXTENSIONS, i as GLuint);
                        if !ext.is_null() {
                            let ext = ffi::CStr::from_ptr(ext as *const _);
                            strings.push(ext.to_string_lossy().into_owned());
                        }
                    }
                    strings
                } else {
                    parse_gl_str(gl::EXTENSIONS)?
                        .split(' ')
                        .map(|e| e.to_owned())
                        .collect()
                };

                Ok(Extensions::from_names(strings))
            }

            /// Builds the list from extension names, unknown names are ignored.
            pub fn from_names<I, S>(names: I) -> Extensions
            where
                I: IntoIterator<Item = S>,
                S: AsRef<str>,
            {
                let mut extensions = Extensions::default();
                for extension in names {
                    match extension.as_ref() {
                        $(
                            $string => extensions.$field = true,
                        )+
                        _ => ()
                    }
                }

                extensions
            }
        }
    }
}

extensions! {
    "GL_ARB_framebuffer_object" => gl_arb_framebuffer_object,
    "GL_EXT_framebuffer_object" => gl_ext_framebuffer_object,
    "GL_ARB_uniform_buffer_object" => gl_arb_uniform_buffer_object,
    "GL_ARB_vertex_array_object" => gl_arb_vertex_array_object,
    "GL_APPLE_vertex_array_object" => gl_apple_vertex_array_object,
    "GL_OES_vertex_array_object" => gl_oes_vertex_array_object,
    "GL_NV_fbo_color_attachments" => gl_nv_fbo_color_attachments,
    "GL_ARB_copy_image" => gl_arb_copy_image,
    "GL_KHR_debug" => gl_khr_debug,
    "GL_EXT_color_buffer_float" => gl_ext_color_buffer_float,
    "GL_ARB_shader_storage_buffer_object" => gl_arb_shader_storage_buffer_object,
}

/// Represents the capabilities of the context.
///
/// Contrary to the state, these values never change.
#[derive(Debug, Clone)]
pub struct Capabilities {
    /// Returns a version or release number. Vendor-specific information may follow the version
    /// number.
    pub version: Version,

    /// The company responsible for this GL implementation.
    pub vendor: String,

    /// The list of OpenGL extensions support by this implementation.
    pub extensions: Extensions,

    /// The name of the renderer. This name is typically specific to a particular
    /// configuration of a hardware platform.
    pub renderer: String,

    /// The OpenGL context profile if available.
    ///
    /// The context profile is available from OpenGL 3.2 onwards. `None` if not supported.
    pub profile: Option<Profile>,

    /// The context is in debug mode, which may have additional error and performance issue
    /// reporting functionality.
    pub debug: bool,

    /// The context is in "forward-compatible" mode, which means that no deprecated functionality
    /// will be supported.
    pub forward_compatible: bool,

    /// Maximum width and height of `glViewport`.
    pub max_viewport_dims: (u32, u32),

    /// Maximum number of textures that can be bound to a program.
    ///
    /// `glActiveTexture` must be between `GL_TEXTURE0` and `GL_TEXTURE0` + this value - 1.
    pub max_combined_texture_image_units: u32,

    /// Number of available buffer bind points for `GL_UNIFORM_BUFFER`.
    pub max_indexed_uniform_buffer: u32,

    /// Maximum number of color attachment bind points.
    pub max_color_attachments: u32,
}

impl Capabilities {
    pub unsafe fn parse() -> Result<Capabilities> {
        let version = Version::parse()?;
        let extensions = Extensions::parse(version)?;

        let (debug, forward_compatible) = if version >= Version::GL(3, 0) {
            let mut val = 0;
            gl::GetIntegerv(gl::CONTEXT_FLAGS, &mut val);
            let val = val as GLenum;
            (
                (val & gl::CONTEXT_FLAG_DEBUG_BIT) != 0,
                (val & gl::CONTEXT_FLAG_FORWARD_COMPATIBLE_BIT) != 0,
            )
        } else {
            (false, false)
        };

        Ok(Capabilities {
            version,
            extensions,
            vendor: parse_gl_str(gl::VENDOR)?,
            renderer: parse_gl_str(gl::RENDERER)?,
            profile: Capabilities::parse_profile(version),
            debug,
            forward_compatible,
            max_viewport_dims: Capabilities::parse_viewport_dims(),
            max_combined_texture_image_units: Capabilities::parse_texture_image_units(),
            max_indexed_uniform_buffer: Capabilities::parse_uniform_buffers(version, &extensions),
            max_color_attachments: Capabilities::parse_color_attachments(version, &extensions),
        })
    }

    /// Describes a context without querying the driver. Limits take the minimum values
    /// guaranteed by the version.
    pub fn with_version(version: Version, extensions: Extensions) -> Capabilities {
        let max_color_attachments = if version >= Version::GL(3, 0) {
            8
        } else if version >= Version::ES(3, 0) {
            4
        } else {
            1
        };

        Capabilities {
            version,
            extensions,
            vendor: String::new(),
            renderer: String::new(),
            profile: None,
            debug: false,
            forward_compatible: false,
            max_viewport_dims: (4096, 4096),
            max_combined_texture_image_units: 16,
            max_indexed_uniform_buffer: 24,
            max_color_attachments,
        }
    }

    /// Rejects contexts which could not host the object model of this crate.
    pub fn validate(&self) -> Result<()> {
        let v = self.version;
        let exts = &self.extensions;

        if !(v >= Version::GL(3, 0)
            || v >= Version::ES(2, 0)
            || exts.gl_ext_framebuffer_object
            || exts.gl_arb_framebuffer_object)
        {
            return Err(Error::Requirement("framebuffer objects".into()));
        }

        if !(v >= Version::GL(3, 1) || v >= Version::ES(3, 0) || exts.gl_arb_uniform_buffer_object) {
            return Err(Error::Requirement("uniform buffer objects".into()));
        }

        if !(v >= Version::GL(3, 0)
            || v >= Version::ES(3, 0)
            || exts.gl_arb_vertex_array_object
            || exts.gl_apple_vertex_array_object
            || exts.gl_oes_vertex_array_object)
        {
            return Err(Error::Requirement("vertex array objects".into()));
        }

        Ok(())
    }

    #[inline]
    pub fn is_es(&self) -> bool {
        self.version.is_es()
    }

    #[inline]
    pub fn supports_multisample_texture(&self) -> bool {
        self.version >= Version::GL(3, 2) || self.version >= Version::ES(3, 1)
    }

    /// Multisample textures are allocated with immutable storage instead of
    /// `glTexImage2DMultisample`.
    #[inline]
    pub fn supports_multisample_storage(&self) -> bool {
        self.version >= Version::ES(3, 1)
    }

    #[inline]
    pub fn supports_geometry_stage(&self) -> bool {
        self.version >= Version::GL(3, 2)
    }

    #[inline]
    pub fn supports_tessellation_stages(&self) -> bool {
        self.version >= Version::GL(4, 0)
    }

    #[inline]
    pub fn supports_get_tex_image(&self) -> bool {
        !self.is_es()
    }

    #[inline]
    pub fn supports_copy_image(&self) -> bool {
        self.version >= Version::GL(4, 3)
            || self.version >= Version::ES(3, 2)
            || self.extensions.gl_arb_copy_image
    }

    #[inline]
    pub fn supports_shader_storage_buffer(&self) -> bool {
        self.version >= Version::GL(4, 3)
            || self.version >= Version::ES(3, 1)
            || self.extensions.gl_arb_shader_storage_buffer_object
    }

    #[inline]
    pub fn supports_debug_output(&self) -> bool {
        self.version >= Version::GL(4, 3) || (!self.is_es() && self.extensions.gl_khr_debug)
    }

    #[inline]
    pub fn supports_bgr_formats(&self) -> bool {
        !self.is_es()
    }

    #[inline]
    pub fn supports_integer_vertex_attribs(&self) -> bool {
        self.version >= Version::GL(3, 0) || self.version >= Version::ES(3, 0)
    }

    #[inline]
    pub fn supports_double_vertex_attribs(&self) -> bool {
        self.version >= Version::GL(4, 1)
    }

    /// Float color attachments fall back to half precision.
    #[inline]
    pub fn prefers_half_float_color(&self) -> bool {
        self.is_es() && !self.extensions.gl_ext_color_buffer_float
    }

    /// Depth attachments are allocated with unsigned integer components.
    #[inline]
    pub fn prefers_integer_depth(&self) -> bool {
        self.is_es()
    }

    /// `glReadPixels` accepts `GL_RGB` with unsigned bytes. Embedded contexts only
    /// guarantee `GL_RGBA`.
    #[inline]
    pub fn supports_rgb_read_back(&self) -> bool {
        !self.is_es()
    }

    #[inline]
    unsafe fn parse_viewport_dims() -> (u32, u32) {
        let mut val: [GLint; 2] = [0, 0];
        gl::GetIntegerv(gl::MAX_VIEWPORT_DIMS, val.as_mut_ptr());
        (val[0] as u32, val[1] as u32)
    }

    #[inline]
    unsafe fn parse_profile(version: Version) -> Option<Profile> {
        if version >= Version::GL(3, 2) {
            let mut val = 0;
            gl::GetIntegerv(gl::CONTEXT_PROFILE_MASK, &mut val);
            let val = val as GLenum;
            if (val & gl::CONTEXT_COMPATIBILITY_PROFILE_BIT) != 0 {
                Some(Profile::Compatibility)
            } else if (val & gl::CONTEXT_CORE_PROFILE_BIT) != 0 {
                Some(Profile::Core)
            } else {
                None
            }
        } else {
            None
        }
    }

    #[inline]
    unsafe fn parse_texture_image_units() -> u32 {
        let mut val = 2;
        gl::GetIntegerv(gl::MAX_COMBINED_TEXTURE_IMAGE_UNITS, &mut val);
        val.max(0) as u32
    }

    #[inline]
    unsafe fn parse_uniform_buffers(version: Version, exts: &Extensions) -> u32 {
        if version >= Version::GL(3, 1)
            || version >= Version::ES(3, 0)
            || exts.gl_arb_uniform_buffer_object
        {
            let mut val = 0;
            gl::GetIntegerv(gl::MAX_UNIFORM_BUFFER_BINDINGS, &mut val);
            val.max(0) as u32
        } else {
            0
        }
    }

    #[inline]
    unsafe fn parse_color_attachments(version: Version, exts: &Extensions) -> u32 {
        if version >= Version::GL(3, 0)
            || version >= Version::ES(3, 0)
            || exts.gl_arb_framebuffer_object
            || exts.gl_ext_framebuffer_object
            || exts.gl_nv_fbo_color_attachments
        {
            let mut val = 4;
            gl::GetIntegerv(gl::MAX_COLOR_ATTACHMENTS, &mut val);
            val.max(0) as u32
        } else if version >= Version::ES(2, 0) {
            1
        } else {
            0
        }
    }
}

unsafe fn parse_gl_str(id: GLenum) -> Result<String> {
    let s = gl::GetString(id);
    if s.is_null() {
        return Err(Error::Driver(format!("String of {:#x} is null.", id)));
    }

    String::from_utf8(ffi::CStr::from_ptr(s as *const _).to_bytes().to_vec())
        .map_err(|_| Error::Driver(format!("String of {:#x} is unformaled.", id)))
}
