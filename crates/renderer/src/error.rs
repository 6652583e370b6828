use std::path::PathBuf;

use thiserror::Error;

/// Shader stage named in compile diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Vertex => f.write_str("vertex"),
            Stage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("could not load shader source from {path}: {source}")]
    ShaderSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("shader source {path} is empty")]
    EmptyShaderSource { path: PathBuf },

    #[error("failed to compile {stage} shader {path}:\n{message}")]
    ShaderCompile {
        stage: Stage,
        path: PathBuf,
        message: String,
    },

    #[error("failed to link shader program: {message}")]
    ProgramLink { message: String },

    #[error("failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image {path} is {width}x{height}; the GPU accepts at most {max} pixels per side")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max: u32,
    },

    #[error("unable to save image {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("pixel buffer of {actual} bytes does not match {width}x{height} with {components} components")]
    InvalidPixelBuffer {
        width: u32,
        height: u32,
        components: u8,
        actual: usize,
    },

    #[error("unsupported component count {0}; expected 1 to 4")]
    UnsupportedComponents(u8),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
