//! Render configuration handling
//!
//! Options start from an optional TOML file using the `RenderOptions`
//! schema, e.g.
//!
//! ```toml
//! shape_rendering = "crisp-edges"
//! draw_background = true
//! background = { r = 1.0, g = 1.0, b = 1.0 }
//! fit_to = { mode = "width", value = 512 }
//! ```
//!
//! Command-line flags are layered on top.

use anyhow::{Context, Result};
use limner_core::{Color, IntSize};
use limner_svg::options::BASE_DPI;
use limner_svg::{FitTo, RenderOptions};
use std::fs;
use std::path::Path;

/// Settings given on the command line
#[derive(Debug, Default)]
pub struct Overrides {
    pub dpi_scale: Option<f32>,
    pub background: Option<Color>,
    pub fit_to: Option<FitTo>,
}

/// Load options from `path`, or the defaults when there is none
pub fn load_options(path: Option<&Path>) -> Result<RenderOptions> {
    let Some(path) = path else {
        return Ok(RenderOptions::default());
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    RenderOptions::from_toml(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Apply command-line settings to `options`
pub fn apply_overrides(options: &mut RenderOptions, overrides: &Overrides) {
    if let Some(color) = overrides.background {
        options.background = color;
        options.draw_background = true;
    }
    if let Some(fit_to) = overrides.fit_to {
        options.fit_to = fit_to;
    }
}

/// Device scale factor for the renderer
///
/// An explicit `--dpi-scale` wins; otherwise the configured dpi is turned
/// back into a scale factor, since loads derive dpi from it.
pub fn scale_factor(options: &RenderOptions, overrides: &Overrides) -> f32 {
    overrides.dpi_scale.unwrap_or(options.dpi / BASE_DPI)
}

/// Parse `WIDTHxHEIGHT`
pub fn parse_size(s: &str) -> std::result::Result<IntSize, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;

    let width: u32 = w.trim().parse().map_err(|_| format!("invalid width '{}'", w))?;
    let height: u32 = h.trim().parse().map_err(|_| format!("invalid height '{}'", h))?;

    if width == 0 || height == 0 {
        return Err(format!("size must be non-zero, got {}x{}", width, height));
    }
    Ok(IntSize::new(width, height))
}

/// Parse `#rrggbb` or `#rrggbbaa`
pub fn parse_color(s: &str) -> std::result::Result<Color, String> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    let value = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid color '{}'", s))?;

    match hex.len() {
        6 => Ok(Color::from_hex(value)),
        8 => Ok(Color::from_hex(value >> 8).with_alpha((value & 0xFF) as f32 / 255.0)),
        _ => Err(format!("expected #rrggbb or #rrggbbaa, got '{}'", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("64x32"), Ok(IntSize::new(64, 32)));
        assert_eq!(parse_size("8X8"), Ok(IntSize::new(8, 8)));
        assert!(parse_size("64").is_err());
        assert!(parse_size("0x10").is_err());
        assert!(parse_size("ax10").is_err());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#ffffff"), Ok(Color::WHITE));
        assert_eq!(parse_color("000000"), Ok(Color::BLACK));
        assert_eq!(parse_color("#00000000"), Ok(Color::TRANSPARENT));
        assert!(parse_color("#fff").is_err());
        assert!(parse_color("#gggggg").is_err());
    }

    #[test]
    fn test_overrides() {
        let mut options = RenderOptions::default();
        let overrides = Overrides {
            dpi_scale: None,
            background: Some(Color::BLACK),
            fit_to: Some(FitTo::Zoom(2.0)),
        };
        apply_overrides(&mut options, &overrides);

        assert!(options.draw_background);
        assert_eq!(options.background, Color::BLACK);
        assert_eq!(options.fit_to, FitTo::Zoom(2.0));
        assert_eq!(scale_factor(&options, &overrides), 1.0);
    }

    #[test]
    fn test_scale_factor_from_dpi() {
        let options = RenderOptions {
            dpi: 192.0,
            ..Default::default()
        };
        assert_eq!(scale_factor(&options, &Overrides::default()), 2.0);

        let explicit = Overrides {
            dpi_scale: Some(3.0),
            ..Default::default()
        };
        assert_eq!(scale_factor(&options, &explicit), 3.0);
    }

    #[test]
    fn test_load_options_from_file() {
        let path = std::env::temp_dir().join(format!("limner-options-{}.toml", std::process::id()));
        fs::write(&path, "draw_background = true\nfont_size = 16.0\n").unwrap();

        let options = load_options(Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(options.draw_background);
        assert_eq!(options.font_size, 16.0);
    }

    #[test]
    fn test_load_options_missing_file() {
        let err = load_options(Some(Path::new("/nonexistent/limner.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
        assert_eq!(load_options(None).unwrap(), RenderOptions::default());
    }
}
