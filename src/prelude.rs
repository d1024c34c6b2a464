pub use cgmath;
pub use cgmath::prelude::{Matrix, One, SquareMatrix, Zero};

pub use crate::backend::{self, BufferUsage, Capabilities, ScalarType, TextureFilter, TextureWrap, Version};
pub use crate::errors::{Error, Result};
pub use crate::settings::Settings;

pub use crate::buffer::{ElementBuffer, ShaderStorageBuffer, UniformBuffer, VertexAttribute, VertexBuffer};
pub use crate::framebuffer::{Framebuffer, FramebufferSetup};
pub use crate::shader::{Shader, ShaderPaths, ShaderSources, ShaderStage, UniformVariable};
pub use crate::texture::{DepthImage, PixelFormat, PixelKind, Pixels, PixelsMut, Texture, TextureCubeMap};
pub use crate::vertex_array::VertexArray;
pub use crate::viewport::{compute_viewport_by_match_image, Viewport, ViewportMatchMode, ViewportSwitcher};
