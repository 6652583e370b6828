use std::path::PathBuf;

use clap::Parser;
use renderer::IMAGE_SLOT_COUNT;
use viewconfig::parse_size;

#[derive(Parser, Debug)]
#[command(
    name = "imagefx",
    author,
    version,
    about = "Interactive image viewer with colour, filter, and blur shader effects",
    long_about = "Keys: 1-6 select an image, C/F/B cycle the colour, filter, and blur \
                  effects, Left/Right rotate, left-drag pans, the wheel zooms, Escape quits."
)]
pub struct Cli {
    /// Configuration file (TOML). Defaults to `$IMAGEFX_CONFIG`, then
    /// `imagefx.toml` in the user config directory.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory that relative image and shader paths resolve against.
    #[arg(long, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Window size in physical pixels (e.g. `512x512`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<(u32, u32)>,

    /// Image slot shown at start-up (1-6).
    #[arg(long, value_name = "N", value_parser = parse_image_slot)]
    pub image: Option<usize>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_image_slot(value: &str) -> Result<usize, String> {
    let trimmed = value.trim();
    let slot: usize = trimmed
        .parse()
        .map_err(|_| format!("invalid image slot '{trimmed}'; expected 1-{IMAGE_SLOT_COUNT}"))?;
    if !(1..=IMAGE_SLOT_COUNT).contains(&slot) {
        return Err(format!(
            "image slot {slot} out of range; expected 1-{IMAGE_SLOT_COUNT}"
        ));
    }
    Ok(slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_image_slots() {
        assert_eq!(parse_image_slot("1").unwrap(), 1);
        assert_eq!(parse_image_slot(" 6 ").unwrap(), 6);
        assert!(parse_image_slot("0").is_err());
        assert!(parse_image_slot("7").is_err());
        assert!(parse_image_slot("two").is_err());
    }

    #[test]
    fn parses_full_command_line() {
        let cli = Cli::try_parse_from([
            "imagefx",
            "--config",
            "viewer.toml",
            "--assets",
            "/srv/imagefx",
            "--size",
            "800x600",
            "--image",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("viewer.toml")));
        assert_eq!(cli.assets, Some(PathBuf::from("/srv/imagefx")));
        assert_eq!(cli.size, Some((800, 600)));
        assert_eq!(cli.image, Some(3));
    }

    #[test]
    fn rejects_malformed_size() {
        assert!(Cli::try_parse_from(["imagefx", "--size", "800"]).is_err());
        assert!(Cli::try_parse_from(["imagefx", "--size", "0x600"]).is_err());
    }

    #[test]
    fn everything_is_optional() {
        let cli = Cli::try_parse_from(["imagefx"]).unwrap();
        assert!(cli.config.is_none());
        assert!(cli.size.is_none());
        assert!(cli.image.is_none());
    }
}
