use std::path::Path;

use anyhow::{Context, Result};
use renderer::{ShaderSources, Viewer, ViewerConfig};
use tracing_subscriber::EnvFilter;
use viewconfig::ViewConfig;

use crate::cli::Cli;
use crate::paths::{locate_config, ConfigLocation};

const _: () = assert!(viewconfig::IMAGE_SLOT_COUNT == renderer::IMAGE_SLOT_COUNT);

pub fn run(cli: Cli) -> Result<()> {
    let location = locate_config(cli.config.as_deref())?;
    let config = match &location {
        Some(location) => {
            tracing::info!(
                path = %location.path.display(),
                origin = %location.origin,
                "loading configuration"
            );
            ViewConfig::load(&location.path).with_context(|| {
                format!("invalid configuration {}", location.path.display())
            })?
        }
        None => ViewConfig::default(),
    };

    let viewer_config = build_viewer_config(&cli, &config, location.as_ref())?;
    tracing::debug!(?viewer_config, "resolved viewer configuration");
    Viewer::new(viewer_config).run()
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Merges the config file with command-line overrides.
///
/// Asset root precedence: `--assets`, then the file's `assets` entry
/// (relative to the file's directory), then the working directory.
pub fn build_viewer_config(
    cli: &Cli,
    config: &ViewConfig,
    location: Option<&ConfigLocation>,
) -> Result<ViewerConfig> {
    let root = match &cli.assets {
        Some(assets) => assets.clone(),
        None => config.asset_root(location.map_or(Path::new(""), ConfigLocation::directory)),
    };
    if !root.as_os_str().is_empty() && !root.is_dir() {
        tracing::warn!(root = %root.display(), "asset directory does not exist");
    }

    let shaders = config.shader_paths(&root);
    let initial_image = match cli.image {
        Some(slot) => slot - 1,
        None => config.initial_slot(),
    };

    Ok(ViewerConfig {
        surface_size: cli.size.unwrap_or(config.window.size),
        title: config.window.title.clone(),
        images: config.image_paths(&root),
        shaders: ShaderSources {
            vertex: shaders.vertex,
            colour: shaders.colour,
            filter: shaders.filter,
            blur: shaders.blur,
        },
        initial_image,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::*;
    use crate::paths::ConfigOrigin;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["imagefx"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_resolve_against_working_directory() {
        let viewer = build_viewer_config(&cli(&[]), &ViewConfig::default(), None).unwrap();
        assert_eq!(viewer.surface_size, (512, 512));
        assert_eq!(viewer.title, "imagefx");
        assert_eq!(viewer.initial_image, 0);
        assert_eq!(viewer.images, ViewerConfig::default().images);
        assert_eq!(viewer.shaders, ShaderSources::default());
    }

    #[test]
    fn command_line_overrides_file_values() {
        let config = ViewConfig::from_toml_str(
            "[window]\nsize = \"640x480\"\n[images]\ninitial = 2\n",
        )
        .unwrap();
        let viewer = build_viewer_config(
            &cli(&["--size", "1024x768", "--image", "5", "--assets", "/data"]),
            &config,
            None,
        )
        .unwrap();
        assert_eq!(viewer.surface_size, (1024, 768));
        assert_eq!(viewer.initial_image, 4);
        assert_eq!(
            viewer.images[0],
            PathBuf::from("/data/images/image1-mandrill.png")
        );
        assert_eq!(
            viewer.shaders.vertex,
            PathBuf::from("/data/shaders/vertex.glsl")
        );
    }

    #[test]
    fn file_assets_resolve_next_to_the_file() {
        let config = ViewConfig::from_toml_str("assets = \"media\"\n[images]\ninitial = 3\n")
            .unwrap();
        let location = ConfigLocation {
            path: PathBuf::from("/etc/imagefx/imagefx.toml"),
            origin: ConfigOrigin::CommandLine,
        };
        let viewer = build_viewer_config(&cli(&[]), &config, Some(&location)).unwrap();
        assert_eq!(viewer.initial_image, 2);
        assert_eq!(
            viewer.shaders.blur,
            PathBuf::from("/etc/imagefx/media/shaders/blurFragment.glsl")
        );
    }
}
