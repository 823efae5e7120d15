//! Chart payloads handed to the charting surface

use serde::Serialize;

use super::options::{ChartOverrides, Palette, TickFormat, TooltipFormat};
use super::revenue::RevenueSeries;
use super::signups::SignupSeries;

/// `{labels, datasets}` payload
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_bar_thickness: Option<u32>,
}

impl Dataset {
    pub fn new(label: impl Into<String>, data: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            data,
            max_bar_thickness: None,
        }
    }

    pub fn max_bar_thickness(mut self, thickness: u32) -> Self {
        self.max_bar_thickness = Some(thickness);
        self
    }
}

impl ChartData {
    /// Single-dataset payload
    pub fn single(labels: &[String], dataset: Dataset) -> Self {
        Self {
            labels: labels.to_vec(),
            datasets: vec![dataset],
        }
    }
}

/// Users and prospects charts sharing one set of overrides
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SignupChart {
    pub options: ChartOverrides,
    pub users: ChartData,
    pub prospects: ChartData,
}

impl From<&SignupSeries> for SignupChart {
    fn from(series: &SignupSeries) -> Self {
        let to_f64 = |values: &[u32]| values.iter().map(|v| f64::from(*v)).collect::<Vec<_>>();

        Self {
            options: ChartOverrides {
                grid_color: Some(Palette::gray(900).to_string()),
                ticks: TickFormat::every(1.0).suffix("p."),
                tooltip: TooltipFormat::new("", " personas"),
            },
            users: ChartData::single(
                &series.labels,
                Dataset::new("Performance", to_f64(&series.values_a[..])),
            ),
            prospects: ChartData::single(
                &series.labels,
                Dataset::new("Performance", to_f64(&series.values_b[..])),
            ),
        }
    }
}

/// Sales bar chart
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RevenueChart {
    pub options: ChartOverrides,
    pub data: ChartData,
}

impl From<&RevenueSeries> for RevenueChart {
    fn from(series: &RevenueSeries) -> Self {
        Self {
            options: ChartOverrides {
                grid_color: None,
                ticks: TickFormat::every(10.0),
                tooltip: TooltipFormat::new("$ ", ""),
            },
            data: ChartData::single(
                &series.labels,
                Dataset::new("Sales", series.values.to_vec()).max_bar_thickness(10),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> [String; 6] {
        ["a", "b", "c", "d", "e", "f"].map(String::from)
    }

    #[test]
    fn test_signup_chart() {
        let series = SignupSeries {
            labels: labels(),
            values_a: [1, 2, 3, 4, 5, 6],
            values_b: [0; 6],
        };
        let chart = SignupChart::from(&series);

        assert_eq!(chart.users.labels, labels().to_vec());
        assert_eq!(chart.users.datasets[0].data, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(chart.prospects.datasets[0].data, vec![0.0; 6]);
        assert_eq!(chart.options.tooltip.label("Performance", 4.0, 1), "4 personas");
    }

    #[test]
    fn test_revenue_chart_json() {
        let series = RevenueSeries {
            labels: labels(),
            values: [10.0, 0.0, 0.0, 0.0, 0.0, 2.5],
        };
        let json = serde_json::to_value(RevenueChart::from(&series)).unwrap();

        assert_eq!(json["data"]["datasets"][0]["label"], "Sales");
        assert_eq!(json["data"]["datasets"][0]["maxBarThickness"], 10);
        assert_eq!(json["data"]["datasets"][0]["data"][5], 2.5);
        assert!(json["options"].get("gridColor").is_none());
    }
}
