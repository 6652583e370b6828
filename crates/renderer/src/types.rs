use std::path::{Path, PathBuf};

use crate::effects::EffectCategory;

/// Number of image slots reachable through the number keys.
pub const IMAGE_SLOT_COUNT: usize = 6;

/// Default window edge length in physical pixels.
pub const DEFAULT_SURFACE_EDGE: u32 = 512;

/// GLSL sources the viewer compiles.
///
/// The vertex shader is shared; each effect category has its own fragment
/// shader which interprets the integer effect uniforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: PathBuf,
    pub colour: PathBuf,
    pub filter: PathBuf,
    pub blur: PathBuf,
}

impl ShaderSources {
    /// Fragment source used while `category` is the active effect family.
    pub fn fragment(&self, category: EffectCategory) -> &Path {
        match category {
            EffectCategory::Colour => &self.colour,
            EffectCategory::Filter => &self.filter,
            EffectCategory::Blur => &self.blur,
        }
    }
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from("shaders/vertex.glsl"),
            colour: PathBuf::from("shaders/colourFragment.glsl"),
            filter: PathBuf::from("shaders/filterFragment.glsl"),
            blur: PathBuf::from("shaders/blurFragment.glsl"),
        }
    }
}

/// Immutable configuration passed to the viewer at start-up.
///
/// `ViewerConfig` mirrors the CLI flags and config file: which images the
/// number keys select, where the GLSL sources live, and how large the window
/// should be.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Window title.
    pub title: String,
    /// Image file for each number key, in key order.
    pub images: [PathBuf; IMAGE_SLOT_COUNT],
    /// Vertex and fragment shader sources.
    pub shaders: ShaderSources,
    /// Zero-based slot shown on the first frame.
    pub initial_image: usize,
}

impl Default for ViewerConfig {
    /// Provides the 512x512 layout with the bundled image names.
    fn default() -> Self {
        Self {
            surface_size: (DEFAULT_SURFACE_EDGE, DEFAULT_SURFACE_EDGE),
            title: "imagefx".to_string(),
            images: [
                "images/image1-mandrill.png",
                "images/image2-uclogo.png",
                "images/image3-aerial.jpg",
                "images/image4-thirsk.jpg",
                "images/image5-pattern.png",
                "images/image6-edc2016.jpg",
            ]
            .map(PathBuf::from),
            shaders: ShaderSources::default(),
            initial_image: 0,
        }
    }
}
