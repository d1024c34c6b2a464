//! # What is This?
//!
//! A thin object layer over the OpenGL and OpenGL ES pipeline. Every type in this crate
//! mirrors exactly one GL object: textures, framebuffers, buffers, vertex arrays and shader
//! programs. Each of them owns its underlying driver handle and releases it on drop.
//!
//! ## Context
//!
//! Functions pointers and capabilities must be loaded once from the thread which owns the
//! GL context before any object is created:
//!
//! ```rust,ignore
//! gloss::backend::load_with(|symbol| window.get_proc_address(symbol) as *const _, Settings::default())?;
//! ```
//!
//! All the objects are bound to that thread. Desktop and embedded differences are answered
//! by `backend::Capabilities` instead of compile-time switches.
//!
//! ## Hot Reload
//!
//! Shaders built from files could watch their sources with `Shader::enable_auto_reload`.
//! File notifications arrive on a watcher thread and are marshalled onto the main-thread
//! task queue, which should be drained once per frame:
//!
//! ```rust,ignore
//! gloss::sched::main_thread().execute();
//! ```

// `#[derive(Fail)]` expands to impls inside a const block.
#![allow(non_local_definitions)]

#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;

pub extern crate cgmath;
pub extern crate gl;
pub extern crate image;

pub mod errors;
pub mod settings;

pub mod backend;
pub mod sched;
pub mod utils;

pub mod buffer;
pub mod framebuffer;
pub mod reload;
pub mod shader;
pub mod texture;
pub mod vertex_array;
pub mod viewport;

pub mod prelude;
