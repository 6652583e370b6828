use std::borrow::Cow;
use std::path::Path;

use wgpu::naga::front::glsl::{Frontend, Options};
use wgpu::naga::ShaderStage;

use crate::error::{Result, Stage, ViewerError};

/// Reads a GLSL source file, rejecting missing or empty files.
pub fn load_source(path: &Path) -> Result<String> {
    let source = std::fs::read_to_string(path).map_err(|source| ViewerError::ShaderSource {
        path: path.to_path_buf(),
        source,
    })?;
    if source.trim().is_empty() {
        return Err(ViewerError::EmptyShaderSource {
            path: path.to_path_buf(),
        });
    }
    Ok(source)
}

/// Runs naga's GLSL frontend over `source` so syntax and type errors
/// surface with parser diagnostics before `wgpu` sees the module.
pub fn check_glsl(stage: Stage, path: &Path, source: &str) -> Result<()> {
    let mut frontend = Frontend::default();
    frontend
        .parse(&Options::from(naga_stage(stage)), source)
        .map(|_| ())
        .map_err(|errors| ViewerError::ShaderCompile {
            stage,
            path: path.to_path_buf(),
            message: errors.to_string(),
        })
}

/// Compiles a GLSL source into a shader module.
///
/// Creation runs inside a validation error scope; anything `wgpu` rejects is
/// reported as a compile failure for `path`.
pub(crate) fn compile_shader(
    device: &wgpu::Device,
    stage: Stage,
    path: &Path,
    source: &str,
) -> Result<wgpu::ShaderModule> {
    check_glsl(stage, path, source)?;

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{stage} shader {}", path.display())),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(source.to_owned()),
            stage: naga_stage(stage),
            defines: &[],
        },
    });
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(ViewerError::ShaderCompile {
            stage,
            path: path.to_path_buf(),
            message: error.to_string(),
        });
    }
    Ok(module)
}

fn naga_stage(stage: Stage) -> ShaderStage {
    match stage {
        Stage::Vertex => ShaderStage::Vertex,
        Stage::Fragment => ShaderStage::Fragment,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn bundled(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../shaders")
            .join(name)
    }

    #[test]
    fn bundled_shaders_parse() {
        let cases = [
            (Stage::Vertex, "vertex.glsl"),
            (Stage::Fragment, "colourFragment.glsl"),
            (Stage::Fragment, "filterFragment.glsl"),
            (Stage::Fragment, "blurFragment.glsl"),
        ];
        for (stage, name) in cases {
            let path = bundled(name);
            let source = load_source(&path).expect("bundled shader readable");
            if let Err(err) = check_glsl(stage, &path, &source) {
                panic!("{err}");
            }
        }
    }

    #[test]
    fn missing_source_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_source(&dir.path().join("nope.glsl")).unwrap_err();
        assert!(matches!(err, ViewerError::ShaderSource { .. }));
    }

    #[test]
    fn blank_source_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.glsl");
        std::fs::write(&path, "  \n\n").unwrap();
        let err = load_source(&path).unwrap_err();
        assert!(matches!(err, ViewerError::EmptyShaderSource { .. }));
    }

    #[test]
    fn syntax_errors_name_the_file() {
        let path = Path::new("broken.glsl");
        let source = "#version 450\nvoid main() { this is not glsl }\n";
        let err = check_glsl(Stage::Fragment, path, source).unwrap_err();
        match err {
            ViewerError::ShaderCompile { stage, path, .. } => {
                assert_eq!(stage, Stage::Fragment);
                assert_eq!(path, Path::new("broken.glsl"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
