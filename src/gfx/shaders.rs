//! Shader source loading and compilation
//!
//! Shaders are identified by file name. The suffix selects the stage
//! (`.vert.wgsl` or `.frag.wgsl`). Names are resolved against an optional
//! search directory first, then the built-in sources, then as a plain path.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::error::{GridError, Result};

/// Pipeline stage a shader source is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub const VERTEX_SUFFIX: &'static str = ".vert.wgsl";
    pub const FRAGMENT_SUFFIX: &'static str = ".frag.wgsl";

    /// Infers the stage from the naming convention
    pub fn from_name(name: &str) -> Result<Self> {
        if name.ends_with(Self::VERTEX_SUFFIX) {
            Ok(ShaderStage::Vertex)
        } else if name.ends_with(Self::FRAGMENT_SUFFIX) {
            Ok(ShaderStage::Fragment)
        } else {
            Err(GridError::UnsupportedShaderName(name.to_owned()))
        }
    }

    /// Entry point every shader of this stage must export
    pub fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }
}

const BUILTIN_SHADERS: &[(&str, &str)] = &[
    (
        "fullscreen.vert.wgsl",
        include_str!("shaders/fullscreen.vert.wgsl"),
    ),
    ("life.frag.wgsl", include_str!("shaders/life.frag.wgsl")),
    (
        "isolation.frag.wgsl",
        include_str!("shaders/isolation.frag.wgsl"),
    ),
    ("render.frag.wgsl", include_str!("shaders/render.frag.wgsl")),
];

/// A compiled shader module together with its stage
pub struct CompiledShader {
    pub name: String,
    pub stage: ShaderStage,
    pub module: wgpu::ShaderModule,
}

impl CompiledShader {
    pub fn entry_point(&self) -> &'static str {
        self.stage.entry_point()
    }
}

/// Resolves shader names to WGSL source and compiles them
#[derive(Debug, Clone, Default)]
pub struct ShaderLibrary {
    search_dir: Option<PathBuf>,
}

impl ShaderLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also look for shaders in `dir`
    ///
    /// Files found there take precedence over built-in sources of the same name.
    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dir = Some(dir.into());
        self
    }

    pub fn builtin_names() -> impl Iterator<Item = &'static str> {
        BUILTIN_SHADERS.iter().map(|(name, _)| *name)
    }

    /// Loads the source text for `name`
    pub fn source(&self, name: &str) -> Result<(ShaderStage, Cow<'static, str>)> {
        let stage = ShaderStage::from_name(name)?;

        if let Some(dir) = &self.search_dir {
            let path = dir.join(name);
            if path.is_file() {
                return Self::read(&path, name).map(|text| (stage, Cow::Owned(text)));
            }
        }

        if let Some((_, text)) = BUILTIN_SHADERS.iter().find(|(builtin, _)| *builtin == name) {
            return Ok((stage, Cow::Borrowed(*text)));
        }

        // Fall back to treating the name as a path
        Self::read(Path::new(name), name).map(|text| (stage, Cow::Owned(text)))
    }

    fn read(path: &Path, name: &str) -> Result<String> {
        std::fs::read_to_string(path).map_err(|source| GridError::ShaderSource {
            name: name.to_owned(),
            source,
        })
    }

    /// Loads and compiles `name`, surfacing the compiler diagnostic on failure
    pub fn compile(&self, device: &wgpu::Device, name: &str) -> Result<CompiledShader> {
        let (stage, source) = self.source(name)?;

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(name),
            source: wgpu::ShaderSource::Wgsl(source),
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(GridError::ShaderCompile {
                name: name.to_owned(),
                log: err.to_string(),
            });
        }

        log::info!("Compiled {:?} shader {}", stage, name);
        Ok(CompiledShader {
            name: name.to_owned(),
            stage,
            module,
        })
    }

    /// Compiles a vertex/fragment pair, checking each has the right stage
    pub fn compile_pair(
        &self,
        device: &wgpu::Device,
        vertex: &str,
        fragment: &str,
    ) -> Result<(CompiledShader, CompiledShader)> {
        let vertex = self.compile(device, vertex)?;
        if vertex.stage != ShaderStage::Vertex {
            return Err(GridError::UnsupportedShaderName(vertex.name));
        }
        let fragment = self.compile(device, fragment)?;
        if fragment.stage != ShaderStage::Fragment {
            return Err(GridError::UnsupportedShaderName(fragment.name));
        }
        Ok((vertex, fragment))
    }
}
