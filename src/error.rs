// src/error.rs
//! Error types for the Gridshade simulator
//!
//! Every variant except `Surface` is a one-time setup or programmer-contract
//! condition. Nothing here is retried.

use thiserror::Error;

use crate::gfx::double_buffer::BufferSlot;

/// Errors raised while setting up or driving the simulation
#[derive(Debug, Error)]
pub enum GridError {
    /// No adapter, device or surface could be obtained
    #[error("no graphics context available: {0}")]
    NoGraphicsContext(String),

    /// A GPU texture or buffer could not be allocated
    #[error("failed to allocate {label}: {log}")]
    Resource { label: String, log: String },

    #[error("shader `{0}` must end with one of [\".vert.wgsl\", \".frag.wgsl\"]")]
    UnsupportedShaderName(String),

    #[error("could not find shader `{name}`")]
    ShaderSource {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Compilation failed; `log` carries the raw diagnostic
    #[error("an error occurred compiling shader `{name}`: {log}")]
    ShaderCompile { name: String, log: String },

    #[error("unable to initialize the `{program}` program: {log}")]
    ProgramLink { program: String, log: String },

    /// The offscreen target would alias the buffer being read
    #[error("offscreen target is attached to the active buffer {0:?}")]
    InvalidRenderTarget(BufferSlot),

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("failed to read back texture: {0}")]
    Readback(String),

    /// The UI overlay failed to prepare or draw a frame
    #[error("ui overlay error: {0}")]
    Ui(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    EventLoop(#[from] winit::error::EventLoopError),
}

pub type Result<T> = std::result::Result<T, GridError>;
