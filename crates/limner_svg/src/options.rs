//! Rendering options handed to the engine

use std::path::PathBuf;

use limner_core::{Color, IntSize};
use serde::{Deserialize, Serialize};

use crate::locale;

/// Resolution a device scale factor of 1.0 maps to
pub const BASE_DPI: f32 = 96.0;

/// Fallback font family
///
/// Fixed rather than taken from the host, whose default family differs
/// between platforms and would make output platform-dependent.
pub const DEFAULT_FONT_FAMILY: &str = "Times New Roman";

pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// `shape-rendering` default for paths without one
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeRendering {
    OptimizeSpeed,
    CrispEdges,
    #[default]
    GeometricPrecision,
}

/// `text-rendering` default for text without one
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextRendering {
    OptimizeSpeed,
    #[default]
    OptimizeLegibility,
    GeometricPrecision,
}

/// `image-rendering` default for raster images without one
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageRendering {
    #[default]
    OptimizeQuality,
    OptimizeSpeed,
}

/// How an intrinsic size is scaled for output
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum FitTo {
    /// Keep the intrinsic size
    #[default]
    Original,
    /// Scale to a width, keeping aspect ratio
    Width(u32),
    /// Scale to a height, keeping aspect ratio
    Height(u32),
    /// Multiply both dimensions
    Zoom(f32),
}

impl FitTo {
    /// Apply this mode to `size`
    ///
    /// Returns `None` when the result would be empty.
    pub fn fit_to_size(&self, size: IntSize) -> Option<IntSize> {
        if size.is_empty() {
            return None;
        }

        let (w, h) = (size.width as f32, size.height as f32);
        let fitted = match *self {
            FitTo::Original => size,
            FitTo::Width(width) => IntSize::new(width, (h * width as f32 / w).ceil() as u32),
            FitTo::Height(height) => IntSize::new((w * height as f32 / h).ceil() as u32, height),
            FitTo::Zoom(zoom) => {
                if !(zoom.is_finite() && zoom > 0.0) {
                    return None;
                }
                IntSize::new((w * zoom).ceil() as u32, (h * zoom).ceil() as u32)
            }
        };

        (!fitted.is_empty()).then_some(fitted)
    }
}

/// Parameters the engine parses and renders with
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Source file, used to resolve relative references
    #[serde(skip)]
    pub path: Option<PathBuf>,
    pub dpi: f32,
    pub font_family: String,
    pub font_size: f32,
    /// BCP-47 tags matched against `systemLanguage`
    pub languages: Vec<String>,
    pub shape_rendering: ShapeRendering,
    pub text_rendering: TextRendering,
    pub image_rendering: ImageRendering,
    pub fit_to: FitTo,
    pub draw_background: bool,
    pub background: Color,
    pub keep_named_groups: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            path: None,
            dpi: BASE_DPI,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            languages: vec![locale::FALLBACK_LANGUAGE.to_string()],
            shape_rendering: ShapeRendering::default(),
            text_rendering: TextRendering::default(),
            image_rendering: ImageRendering::default(),
            fit_to: FitTo::default(),
            draw_background: false,
            background: Color::WHITE,
            keep_named_groups: false,
        }
    }
}

impl RenderOptions {
    /// Finish engine defaults for this host and device scale
    pub fn initialize(mut self, scale_factor: f32) -> Self {
        self.font_family = DEFAULT_FONT_FAMILY.to_string();
        self.languages = vec![locale::host_language_tag()];
        self.dpi = BASE_DPI * scale_factor;
        self
    }

    /// Parse options from TOML; missing keys keep their defaults
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_scales_dpi() {
        let opt = RenderOptions::default().initialize(2.0);
        assert_eq!(opt.dpi, 192.0);
        assert_eq!(opt.font_family, DEFAULT_FONT_FAMILY);
        assert_eq!(opt.languages.len(), 1);
    }

    #[test]
    fn test_initialize_overrides_font_family() {
        let engine_defaults = RenderOptions {
            font_family: "Comic Sans MS".to_string(),
            ..Default::default()
        };
        assert_eq!(
            engine_defaults.initialize(1.0).font_family,
            DEFAULT_FONT_FAMILY
        );
    }

    #[test]
    fn test_fit_to() {
        let size = IntSize::new(200, 100);
        assert_eq!(FitTo::Original.fit_to_size(size), Some(size));
        assert_eq!(FitTo::Width(100).fit_to_size(size), Some(IntSize::new(100, 50)));
        assert_eq!(FitTo::Height(50).fit_to_size(size), Some(IntSize::new(100, 50)));
        assert_eq!(FitTo::Zoom(1.5).fit_to_size(size), Some(IntSize::new(300, 150)));
    }

    #[test]
    fn test_fit_to_rejects_empty() {
        assert_eq!(FitTo::Original.fit_to_size(IntSize::ZERO), None);
        assert_eq!(FitTo::Zoom(0.0).fit_to_size(IntSize::new(10, 10)), None);
        assert_eq!(FitTo::Width(0).fit_to_size(IntSize::new(10, 10)), None);
    }

    #[test]
    fn test_from_toml_partial() {
        let opt = RenderOptions::from_toml(
            r#"
            dpi = 144.0
            shape_rendering = "crisp-edges"
            draw_background = true
            background = { r = 0.0, g = 0.0, b = 1.0 }
            fit_to = { mode = "width", value = 320 }
            "#,
        )
        .unwrap();

        assert_eq!(opt.dpi, 144.0);
        assert_eq!(opt.shape_rendering, ShapeRendering::CrispEdges);
        assert!(opt.draw_background);
        assert_eq!(opt.background, Color::rgb(0.0, 0.0, 1.0));
        assert_eq!(opt.fit_to, FitTo::Width(320));
        assert_eq!(opt.font_family, DEFAULT_FONT_FAMILY);
        assert_eq!(opt.path, None);
    }
}
