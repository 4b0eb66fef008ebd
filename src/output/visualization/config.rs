//! Plot configuration shared across visualization modules

use std::path::Path;

use plotters::prelude::*;

/// Configuration for customizing plots
///
/// Used by both the runoff series chart and the field heatmap.
///
/// # Example
///
/// ```rust
/// use fern_rs::output::PlotConfig;
/// use plotters::prelude::*;
///
/// let mut config = PlotConfig::runoff("Surface nitrogen");
/// config.line_color = BLUE;
/// config.width = 1920;
/// config.height = 1080;
///
/// assert_eq!(config.xlabel, "Time (days)");
/// ```
#[derive(Clone)]
pub struct PlotConfig {
    /// Image width in pixels (default: 1024)
    pub width: u32,

    /// Image height in pixels (default: 768)
    pub height: u32,

    /// Plot title (default: "Plot")
    pub title: String,

    /// X-axis label (set by plot type)
    pub xlabel: String,

    /// Y-axis label (default: "Concentration (ppm)")
    pub ylabel: String,

    /// Concentration curve colour (default: BLUE)
    pub line_color: RGBColor,

    /// Safe-level line colour (default: RED)
    pub safe_level_color: RGBColor,

    /// Colour of excluded cells in heatmaps (default: light grey)
    pub excluded_color: RGBColor,

    /// Background color (default: WHITE)
    pub background: RGBColor,

    /// Line width in pixels (default: 2)
    pub line_width: u32,

    /// Show grid lines (default: true)
    pub show_grid: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "Plot".to_string(),
            xlabel: String::new(),
            ylabel: "Concentration (ppm)".to_string(),
            line_color: BLUE,
            safe_level_color: RED,
            excluded_color: RGBColor(200, 200, 200),
            background: WHITE,
            line_width: 2,
            show_grid: true,
        }
    }
}

/// Helper trait to accept both `String` and `None` for optional titles
pub trait IntoOptionalTitle {
    fn into_optional_title(self) -> Option<String>;
}

impl IntoOptionalTitle for &str {
    fn into_optional_title(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl IntoOptionalTitle for String {
    fn into_optional_title(self) -> Option<String> {
        Some(self)
    }
}

impl<T: IntoOptionalTitle> IntoOptionalTitle for Option<T> {
    fn into_optional_title(self) -> Option<String> {
        self.and_then(|t| t.into_optional_title())
    }
}

/// Constant for no title (default title will be used)
pub const NO_TITLE: Option<&str> = None;

impl PlotConfig {
    /// Concentration over time, titled "Fertilizer Runoff" by default
    pub fn runoff(title: impl IntoOptionalTitle) -> Self {
        Self {
            xlabel: "Time (days)".to_string(),
            title: title
                .into_optional_title()
                .unwrap_or_else(|| "Fertilizer Runoff".to_string()),
            ..Self::default()
        }
    }

    /// Farm grid layer, titled "Field Concentration" by default
    pub fn heatmap(title: impl IntoOptionalTitle) -> Self {
        Self {
            xlabel: "Row (x)".to_string(),
            ylabel: "Column (y)".to_string(),
            title: title
                .into_optional_title()
                .unwrap_or_else(|| "Field Concentration".to_string()),
            ..Self::default()
        }
    }
}

/// Image format chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ImageFormat {
    Svg,
    Bitmap,
}

impl ImageFormat {
    pub(crate) fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => Self::Svg,
            _ => Self::Bitmap,
        }
    }

    /// Whether captions, tick labels and legends can be rendered
    ///
    /// SVG writes text elements directly. Bitmaps need a font backend, which
    /// is only compiled in with the `ttf` feature.
    pub(crate) fn draws_text(self) -> bool {
        match self {
            Self::Svg => true,
            Self::Bitmap => cfg!(feature = "ttf"),
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
