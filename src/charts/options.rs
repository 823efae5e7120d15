//! Chart surface configuration
//!
//! The charting surface receives one [`ChartOptions`] value at construction time
//! plus a [`ChartOverrides`] per chart. Nothing here touches shared library state:
//! the presentation layer serializes these values and hands them over.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Base font family
pub const FONT_FAMILY: &str = "Open Sans";

/// Gray scale, lightest to darkest
const GRAY: [(u16, &str); 9] = [
    (100, "#f6f9fc"),
    (200, "#e9ecef"),
    (300, "#dee2e6"),
    (400, "#ced4da"),
    (500, "#adb5bd"),
    (600, "#8898aa"),
    (700, "#525f7f"),
    (800, "#32325d"),
    (900, "#212529"),
];

/// Light or dark dashboard theme
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme: {}", other)),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// Named colors of the dashboard
pub struct Palette;

impl Palette {
    pub const DEFAULT: &'static str = "#172b4d";
    pub const PRIMARY: &'static str = "#5e72e4";
    pub const SECONDARY: &'static str = "#f4f5f7";
    pub const INFO: &'static str = "#11cdef";
    pub const SUCCESS: &'static str = "#2dce89";
    pub const DANGER: &'static str = "#f5365c";
    pub const WARNING: &'static str = "#fb6340";
    pub const BLACK: &'static str = "#12263F";
    pub const WHITE: &'static str = "#FFFFFF";
    pub const TRANSPARENT: &'static str = "transparent";

    /// Gray scale lookup (100-900); unknown levels fall back to the nearest darker shade
    pub fn gray(level: u16) -> &'static str {
        GRAY.iter()
            .find(|(l, _)| *l >= level)
            .map(|(_, c)| *c)
            .unwrap_or(GRAY[GRAY.len() - 1].1)
    }
}

/// Global chart defaults
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub default_color: String,
    pub default_font_color: String,
    pub default_font_family: String,
    pub default_font_size: u32,
    pub layout: Layout,
    pub legend: Legend,
    pub elements: Elements,
    pub tooltips: Tooltips,
    pub doughnut: Doughnut,
    pub scales: ScaleDefaults,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Layout {
    pub padding: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub display: bool,
    pub position: String,
    pub labels: LegendLabels,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LegendLabels {
    pub use_point_style: bool,
    pub padding: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Elements {
    pub point: PointStyle,
    pub line: LineStyle,
    pub rectangle: BarStyle,
    pub arc: ArcStyle,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PointStyle {
    pub radius: u32,
    pub background_color: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineStyle {
    pub tension: f64,
    pub border_width: u32,
    pub border_color: String,
    pub background_color: String,
    pub border_cap_style: String,
}

/// Bars are drawn with rounded corners
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BarStyle {
    pub background_color: String,
    pub corner_radius: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArcStyle {
    pub background_color: String,
    pub border_color: String,
    pub border_width: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Tooltips {
    pub enabled: bool,
    pub mode: String,
    pub intersect: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Doughnut {
    pub cutout_percentage: u32,
}

/// Axis defaults: `linear` is the value axis, `category` the month axis
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScaleDefaults {
    pub linear: AxisStyle,
    pub category: AxisStyle,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AxisStyle {
    pub grid_lines: GridLines,
    pub ticks: Ticks,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GridLines {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_dash: Option<[u32; 1]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_dash_offset: Option<[u32; 1]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub draw_border: bool,
    pub draw_on_chart_area: bool,
    pub draw_ticks: bool,
    pub line_width: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero_line_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero_line_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero_line_border_dash: Option<[u32; 1]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero_line_border_dash_offset: Option<[u32; 1]>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ticks {
    pub begin_at_zero: bool,
    pub padding: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<TickFormat>,
}

impl ChartOptions {
    /// Build the global defaults for a theme
    pub fn new(theme: Theme) -> Self {
        let (text, arc_border, grid) = match theme {
            Theme::Light => (Palette::gray(600), Palette::WHITE, Palette::gray(300)),
            Theme::Dark => (Palette::gray(700), Palette::gray(800), Palette::gray(900)),
        };

        Self {
            responsive: true,
            maintain_aspect_ratio: false,
            default_color: text.to_string(),
            default_font_color: text.to_string(),
            default_font_family: FONT_FAMILY.to_string(),
            default_font_size: 13,
            layout: Layout { padding: 0 },
            legend: Legend {
                display: false,
                position: "bottom".to_string(),
                labels: LegendLabels {
                    use_point_style: true,
                    padding: 16,
                },
            },
            elements: Elements {
                point: PointStyle {
                    radius: 0,
                    background_color: Palette::PRIMARY.to_string(),
                },
                line: LineStyle {
                    tension: 0.4,
                    border_width: 4,
                    border_color: Palette::PRIMARY.to_string(),
                    background_color: Palette::TRANSPARENT.to_string(),
                    border_cap_style: "rounded".to_string(),
                },
                rectangle: BarStyle {
                    background_color: Palette::WARNING.to_string(),
                    corner_radius: 6,
                },
                arc: ArcStyle {
                    background_color: Palette::PRIMARY.to_string(),
                    border_color: arc_border.to_string(),
                    border_width: 4,
                },
            },
            tooltips: Tooltips {
                enabled: true,
                mode: "index".to_string(),
                intersect: false,
            },
            doughnut: Doughnut {
                cutout_percentage: 83,
            },
            scales: ScaleDefaults {
                linear: AxisStyle {
                    grid_lines: GridLines {
                        border_dash: Some([2]),
                        border_dash_offset: Some([2]),
                        color: Some(grid.to_string()),
                        draw_border: false,
                        draw_on_chart_area: true,
                        draw_ticks: false,
                        line_width: 0,
                        zero_line_width: Some(0),
                        zero_line_color: Some(grid.to_string()),
                        zero_line_border_dash: Some([2]),
                        zero_line_border_dash_offset: Some([2]),
                    },
                    ticks: Ticks {
                        begin_at_zero: true,
                        padding: 10,
                        format: Some(TickFormat::every(10.0)),
                    },
                },
                category: AxisStyle {
                    grid_lines: GridLines {
                        draw_border: false,
                        draw_on_chart_area: false,
                        draw_ticks: false,
                        ..Default::default()
                    },
                    ticks: Ticks {
                        begin_at_zero: false,
                        padding: 20,
                        format: None,
                    },
                },
            },
        }
    }
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

/// Which value-axis ticks get a label, and how
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TickFormat {
    /// Only multiples of this step are labelled
    pub step: f64,
    pub suffix: String,
}

impl TickFormat {
    pub fn every(step: f64) -> Self {
        Self {
            step,
            suffix: String::new(),
        }
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Label for a tick value, `None` when the tick stays unlabelled
    pub fn label(&self, value: f64) -> Option<String> {
        if self.step > 0.0 && value % self.step == 0.0 {
            Some(format!("{}{}", value, self.suffix))
        } else {
            None
        }
    }
}

/// Tooltip line rendering
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TooltipFormat {
    pub prefix: String,
    pub suffix: String,
}

impl TooltipFormat {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Render the tooltip for one point
    ///
    /// The dataset label is only shown when the chart has more than one dataset.
    pub fn label(&self, dataset_label: &str, value: f64, dataset_count: usize) -> String {
        let mut content = String::new();
        if dataset_count > 1 {
            content.push_str(dataset_label);
        }
        content.push_str(&self.prefix);
        content.push_str(&value.to_string());
        content.push_str(&self.suffix);
        content
    }
}

/// Per-chart adjustments layered over [`ChartOptions`]
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_color: Option<String>,
    pub ticks: TickFormat,
    pub tooltip: TooltipFormat,
}

/// Legend markup for doughnut charts
///
/// Labels without a matching color get a transparent indicator.
pub fn doughnut_legend(labels: &[String], colors: &[String]) -> String {
    labels
        .iter()
        .enumerate()
        .map(|(idx, label)| {
            let color = colors
                .get(idx)
                .map(String::as_str)
                .unwrap_or(Palette::TRANSPARENT);
            format!(
                "<span class=\"chart-legend-item\"><i class=\"chart-legend-indicator\" style=\"background-color: {}\"></i>{}</span>",
                color, label
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_colors() {
        let light = ChartOptions::new(Theme::Light);
        let dark = ChartOptions::new(Theme::Dark);

        assert_eq!(light.default_color, "#8898aa");
        assert_eq!(dark.default_color, "#525f7f");
        assert_eq!(light.elements.arc.border_color, Palette::WHITE);
        assert_eq!(dark.elements.arc.border_color, "#32325d");
        assert_eq!(light.scales.linear.grid_lines.color.as_deref(), Some("#dee2e6"));
        assert_eq!(dark.scales.linear.grid_lines.color.as_deref(), Some("#212529"));
    }

    #[test]
    fn test_options_serialize_camel_case() {
        let json = serde_json::to_value(ChartOptions::default()).unwrap();

        assert_eq!(json["maintainAspectRatio"], false);
        assert_eq!(json["defaultFontFamily"], "Open Sans");
        assert_eq!(json["doughnut"]["cutoutPercentage"], 83);
        assert_eq!(json["elements"]["rectangle"]["cornerRadius"], 6);
        assert!(json["scales"]["category"]["gridLines"].get("color").is_none());
    }

    #[test]
    fn test_linear_grid_zero_line() {
        let json = serde_json::to_value(ChartOptions::new(Theme::Dark)).unwrap();
        let grid = &json["scales"]["linear"]["gridLines"];

        assert_eq!(grid["borderDash"], serde_json::json!([2]));
        assert_eq!(grid["borderDashOffset"], serde_json::json!([2]));
        assert_eq!(grid["zeroLineWidth"], 0);
        assert_eq!(grid["zeroLineColor"], "#212529");
        assert_eq!(grid["zeroLineBorderDash"], serde_json::json!([2]));
        assert_eq!(grid["zeroLineBorderDashOffset"], serde_json::json!([2]));

        let category = &json["scales"]["category"]["gridLines"];
        assert!(category.get("zeroLineWidth").is_none());
    }

    #[test]
    fn test_gray_lookup() {
        assert_eq!(Palette::gray(100), "#f6f9fc");
        assert_eq!(Palette::gray(650), "#525f7f");
        assert_eq!(Palette::gray(1000), "#212529");
    }

    #[test]
    fn test_tick_format() {
        let ticks = TickFormat::every(10.0);
        assert_eq!(ticks.label(0.0).as_deref(), Some("0"));
        assert_eq!(ticks.label(20.0).as_deref(), Some("20"));
        assert_eq!(ticks.label(15.0), None);

        let people = TickFormat::every(1.0).suffix("p.");
        assert_eq!(people.label(3.0).as_deref(), Some("3p."));
        assert_eq!(people.label(2.5), None);
    }

    #[test]
    fn test_tooltip_format() {
        let money = TooltipFormat::new("$ ", "");
        assert_eq!(money.label("Sales", 120.5, 1), "$ 120.5");
        assert_eq!(money.label("Sales", 3.0, 2), "Sales$ 3");
    }

    #[test]
    fn test_doughnut_legend() {
        let labels = vec!["Users".to_string(), "Prospects".to_string()];
        let colors = vec![Palette::PRIMARY.to_string()];
        let html = doughnut_legend(&labels, &colors);

        assert!(html.contains("background-color: #5e72e4\"></i>Users</span>"));
        assert!(html.contains("background-color: transparent\"></i>Prospects</span>"));
        assert_eq!(html.matches("chart-legend-item").count(), 2);
    }
}
