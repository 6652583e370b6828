use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Number of image slots reachable through the number keys.
pub const IMAGE_SLOT_COUNT: usize = 6;

/// Default window edge length in pixels.
pub const DEFAULT_WINDOW_EDGE: u32 = 512;

const DEFAULT_IMAGES: [&str; IMAGE_SLOT_COUNT] = [
    "images/image1-mandrill.png",
    "images/image2-uclogo.png",
    "images/image3-aerial.jpg",
    "images/image4-thirsk.jpg",
    "images/image5-pattern.png",
    "images/image6-edc2016.jpg",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read configuration at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level viewer configuration as read from `imagefx.toml`.
///
/// Every section is optional; omitted values fall back to the built-in
/// layout (six bundled images, four GLSL sources under `shaders/`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Root directory that relative image and shader paths resolve against.
    pub assets: Option<PathBuf>,
    pub window: WindowSection,
    pub images: ImagesSection,
    pub shaders: ShadersSection,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowSection {
    pub title: String,
    #[serde(deserialize_with = "deserialize_size")]
    pub size: (u32, u32),
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            title: "imagefx".to_string(),
            size: (DEFAULT_WINDOW_EDGE, DEFAULT_WINDOW_EDGE),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ImagesSection {
    /// Overrides for the leading slots; missing trailing slots keep their defaults.
    pub slots: Vec<PathBuf>,
    /// Slot shown at start-up, 1-based to match the number keys.
    pub initial: usize,
}

impl Default for ImagesSection {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            initial: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShadersSection {
    pub vertex: PathBuf,
    pub colour: PathBuf,
    pub filter: PathBuf,
    pub blur: PathBuf,
}

impl Default for ShadersSection {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from("shaders/vertex.glsl"),
            colour: PathBuf::from("shaders/colourFragment.glsl"),
            filter: PathBuf::from("shaders/filterFragment.glsl"),
            blur: PathBuf::from("shaders/blurFragment.glsl"),
        }
    }
}

impl ViewConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: ViewConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.slots.len() > IMAGE_SLOT_COUNT {
            return Err(ConfigError::Invalid(format!(
                "images.slots lists {} entries; at most {IMAGE_SLOT_COUNT} are supported",
                self.images.slots.len()
            )));
        }

        for (index, slot) in self.images.slots.iter().enumerate() {
            if slot.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "images.slots entry {} is empty",
                    index + 1
                )));
            }
        }

        if !(1..=IMAGE_SLOT_COUNT).contains(&self.images.initial) {
            return Err(ConfigError::Invalid(format!(
                "images.initial must be between 1 and {IMAGE_SLOT_COUNT}, got {}",
                self.images.initial
            )));
        }

        let (width, height) = self.window.size;
        if width == 0 || height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window.size must be non-zero, got {width}x{height}"
            )));
        }

        for (name, path) in [
            ("vertex", &self.shaders.vertex),
            ("colour", &self.shaders.colour),
            ("filter", &self.shaders.filter),
            ("blur", &self.shaders.blur),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "shaders.{name} must not be empty"
                )));
            }
        }

        Ok(())
    }

    /// Root that relative image and shader paths resolve against.
    ///
    /// A relative `assets` entry is taken relative to `config_dir`, the
    /// directory holding the file. Without one the working directory is used.
    pub fn asset_root(&self, config_dir: &Path) -> PathBuf {
        match &self.assets {
            Some(assets) => config_dir.join(assets),
            None => PathBuf::new(),
        }
    }

    /// Image paths for every slot, resolved against `root`.
    pub fn image_paths(&self, root: &Path) -> [PathBuf; IMAGE_SLOT_COUNT] {
        std::array::from_fn(|index| {
            let relative = self
                .images
                .slots
                .get(index)
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGES[index]));
            root.join(relative)
        })
    }

    /// Shader paths resolved against `root`.
    pub fn shader_paths(&self, root: &Path) -> ShadersSection {
        ShadersSection {
            vertex: root.join(&self.shaders.vertex),
            colour: root.join(&self.shaders.colour),
            filter: root.join(&self.shaders.filter),
            blur: root.join(&self.shaders.blur),
        }
    }

    /// Zero-based index of the start-up slot.
    pub fn initial_slot(&self) -> usize {
        self.images.initial.saturating_sub(1)
    }
}

/// Parses a `WIDTHxHEIGHT` string such as `512x512`.
pub fn parse_size(raw: &str) -> Result<(u32, u32), String> {
    let trimmed = raw.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("invalid size '{trimmed}'; expected WIDTHxHEIGHT"))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width in size '{trimmed}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height in size '{trimmed}'"))?;
    if width == 0 || height == 0 {
        return Err(format!("size '{trimmed}' must be non-zero"));
    }
    Ok((width, height))
}

fn deserialize_size<'de, D>(deserializer: D) -> Result<(u32, u32), D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = (u32, u32);

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a size as \"WIDTHxHEIGHT\", [width, height], or a single edge length")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            parse_size(v).map_err(E::custom)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let edge = u32::try_from(v).map_err(|_| E::custom("size must be a positive integer"))?;
            Ok((edge, edge))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let edge = u32::try_from(v).map_err(|_| E::custom("size is out of range"))?;
            Ok((edge, edge))
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let width: u32 = seq
                .next_element()?
                .ok_or_else(|| de::Error::invalid_length(0, &self))?;
            let height: u32 = seq
                .next_element()?
                .ok_or_else(|| de::Error::invalid_length(1, &self))?;
            if seq.next_element::<u32>()?.is_some() {
                return Err(de::Error::invalid_length(3, &self));
            }
            Ok((width, height))
        }
    }

    deserializer.deserialize_any(Visitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
assets = "/opt/imagefx"

[window]
title = "effects"
size = "800x600"

[images]
slots = ["photos/cat.png", "photos/dog.jpg"]
initial = 2

[shaders]
blur = "custom/blur.glsl"
"#;

    #[test]
    fn parses_sample_config() {
        let config = ViewConfig::from_toml_str(SAMPLE).expect("parse config");
        assert_eq!(config.assets.as_deref(), Some(Path::new("/opt/imagefx")));
        assert_eq!(config.window.title, "effects");
        assert_eq!(config.window.size, (800, 600));
        assert_eq!(config.initial_slot(), 1);
        assert_eq!(config.shaders.blur, PathBuf::from("custom/blur.glsl"));
        assert_eq!(config.shaders.vertex, PathBuf::from("shaders/vertex.glsl"));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = ViewConfig::from_toml_str("").expect("parse config");
        let root = Path::new("/assets");
        let images = config.image_paths(root);
        assert_eq!(images[0], root.join("images/image1-mandrill.png"));
        assert_eq!(images[5], root.join("images/image6-edc2016.jpg"));
        assert_eq!(config.window.size, (512, 512));
        assert_eq!(config.initial_slot(), 0);
        let shaders = config.shader_paths(root);
        assert_eq!(shaders.colour, root.join("shaders/colourFragment.glsl"));
    }

    #[test]
    fn asset_root_is_relative_to_config_directory() {
        let config = ViewConfig::from_toml_str("assets = \"media\"").expect("parse config");
        assert_eq!(
            config.asset_root(Path::new("/etc/imagefx")),
            PathBuf::from("/etc/imagefx/media")
        );

        let absolute = ViewConfig::from_toml_str(SAMPLE).expect("parse config");
        assert_eq!(
            absolute.asset_root(Path::new("/etc/imagefx")),
            PathBuf::from("/opt/imagefx")
        );

        let unset = ViewConfig::default();
        assert_eq!(unset.asset_root(Path::new("/etc/imagefx")), PathBuf::new());
    }

    #[test]
    fn slot_overrides_keep_trailing_defaults() {
        let config = ViewConfig::from_toml_str(SAMPLE).expect("parse config");
        let root = Path::new("/assets");
        let images = config.image_paths(root);
        assert_eq!(images[0], root.join("photos/cat.png"));
        assert_eq!(images[1], root.join("photos/dog.jpg"));
        assert_eq!(images[2], root.join("images/image3-aerial.jpg"));
    }

    #[test]
    fn rejects_too_many_slots() {
        let config = r#"
[images]
slots = ["1.png", "2.png", "3.png", "4.png", "5.png", "6.png", "7.png"]
"#;
        let err = ViewConfig::from_toml_str(config).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_out_of_range_initial_slot() {
        let err = ViewConfig::from_toml_str("[images]\ninitial = 7\n").unwrap_err();
        assert!(err.to_string().contains("images.initial"));
        let err = ViewConfig::from_toml_str("[images]\ninitial = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn accepts_array_and_edge_sizes() {
        let config = ViewConfig::from_toml_str("[window]\nsize = [640, 480]\n").unwrap();
        assert_eq!(config.window.size, (640, 480));
        let config = ViewConfig::from_toml_str("[window]\nsize = 256\n").unwrap();
        assert_eq!(config.window.size, (256, 256));
    }

    #[test]
    fn rejects_zero_window_size() {
        let err = ViewConfig::from_toml_str("[window]\nsize = [0, 480]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn parse_size_rejects_garbage() {
        assert_eq!(parse_size("1024X768"), Ok((1024, 768)));
        assert!(parse_size("1024").is_err());
        assert!(parse_size("0x10").is_err());
        assert!(parse_size("axb").is_err());
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("imagefx.toml");
        fs::write(&path, SAMPLE).unwrap();
        let config = ViewConfig::load(&path).expect("load config");
        assert_eq!(config.window.size, (800, 600));

        let missing = ViewConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
