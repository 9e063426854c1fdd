use core_types::{PlatformSales, Region};
use serde::Serialize;
use std::fmt::Write as _;

/// Label used for sales whose platform id has no dimension row.
pub const UNKNOWN_PLATFORM: &str = "(unknown)";

const WIDTH: f64 = 720.0;
const HEIGHT: f64 = 420.0;
const MARGIN_LEFT: f64 = 72.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 48.0;
const MARGIN_BOTTOM: f64 = 96.0;
const GRID_LINES: usize = 5;
const BAR_FILL: &str = "#636efa";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

/// A vertical bar chart: one bar per platform, height = summed sales.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
}

impl BarChart {
    pub fn platform_sales(region: Region, rows: &[PlatformSales]) -> Self {
        Self {
            title: format!("Sales by Platform - {region}"),
            x_label: "Platform".to_string(),
            y_label: "Sales (Millions)".to_string(),
            bars: rows
                .iter()
                .map(|row| Bar {
                    label: row.platform.clone().unwrap_or_else(|| UNKNOWN_PLATFORM.to_string()),
                    value: row.total_sales,
                })
                .collect(),
        }
    }

    /// Renders the chart as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let baseline = MARGIN_TOP + plot_height;

        let mut svg = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}" width="{WIDTH}" height="{HEIGHT}" font-family="sans-serif" font-size="12">"#
        );
        let _ = writeln!(
            svg,
            r#"<text x="{x}" y="24" text-anchor="middle" font-size="16">{title}</text>"#,
            x = WIDTH / 2.0,
            title = escape(&self.title)
        );
        let _ = writeln!(
            svg,
            r#"<text transform="translate(16 {y}) rotate(-90)" text-anchor="middle">{label}</text>"#,
            y = MARGIN_TOP + plot_height / 2.0,
            label = escape(&self.y_label)
        );
        let _ = writeln!(
            svg,
            r#"<text x="{x}" y="{y}" text-anchor="middle">{label}</text>"#,
            x = MARGIN_LEFT + plot_width / 2.0,
            y = HEIGHT - 8.0,
            label = escape(&self.x_label)
        );

        let max = self.bars.iter().map(|bar| bar.value).fold(0.0_f64, f64::max);
        let scale_max = if max > 0.0 { max } else { 1.0 };

        for step in 0..=GRID_LINES {
            let value = scale_max * step as f64 / GRID_LINES as f64;
            let y = baseline - plot_height * step as f64 / GRID_LINES as f64;
            let _ = writeln!(
                svg,
                r##"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="#e5e5e5"/>"##,
                x2 = MARGIN_LEFT + plot_width
            );
            let _ = writeln!(
                svg,
                r#"<text x="{x:.1}" y="{y:.1}" text-anchor="end" dominant-baseline="middle">{value:.2}</text>"#,
                x = MARGIN_LEFT - 6.0
            );
        }

        if self.bars.is_empty() {
            let _ = writeln!(
                svg,
                r##"<text x="{x}" y="{y}" text-anchor="middle" fill="#888">No data for the current selection</text>"##,
                x = MARGIN_LEFT + plot_width / 2.0,
                y = MARGIN_TOP + plot_height / 2.0
            );
        }

        let slot = plot_width / self.bars.len().max(1) as f64;
        let bar_width = slot * 0.7;
        for (i, bar) in self.bars.iter().enumerate() {
            let height = plot_height * bar.value.max(0.0) / scale_max;
            let x = MARGIN_LEFT + slot * i as f64 + (slot - bar_width) / 2.0;
            let center = x + bar_width / 2.0;
            let label = escape(&bar.label);
            let _ = writeln!(
                svg,
                r#"<rect x="{x:.1}" y="{y:.1}" width="{bar_width:.1}" height="{height:.1}" fill="{BAR_FILL}"><title>{label}: {value:.2}</title></rect>"#,
                y = baseline - height,
                value = bar.value
            );
            let _ = writeln!(
                svg,
                r#"<text transform="translate({center:.1} {y:.1}) rotate(-45)" text-anchor="end">{label}</text>"#,
                y = baseline + 12.0
            );
        }

        let _ = writeln!(
            svg,
            r##"<line x1="{MARGIN_LEFT}" y1="{baseline}" x2="{x2}" y2="{baseline}" stroke="#444"/>"##,
            x2 = MARGIN_LEFT + plot_width
        );
        svg.push_str("</svg>\n");
        svg
    }
}

/// Escapes text for use in SVG/HTML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<PlatformSales> {
        vec![
            PlatformSales { platform: Some("DS".to_string()), total_sales: 12.61 },
            PlatformSales { platform: Some("Wii".to_string()), total_sales: 10.85 },
            PlatformSales { platform: None, total_sales: 1.0 },
        ]
    }

    #[test]
    fn one_bar_per_platform_in_row_order() {
        let chart = BarChart::platform_sales(Region::Japan, &rows());
        assert_eq!(chart.title, "Sales by Platform - Japan");
        assert_eq!(chart.y_label, "Sales (Millions)");
        let labels: Vec<_> = chart.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["DS", "Wii", UNKNOWN_PLATFORM]);
    }

    #[test]
    fn svg_contains_a_rect_per_bar_and_escapes_labels() {
        let mut data = rows();
        data.push(PlatformSales {
            platform: Some("Tiger's <Handheld>".to_string()),
            total_sales: 0.5,
        });
        let svg = BarChart::platform_sales(Region::Global, &data).to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<rect").count(), 4);
        assert!(svg.contains("Tiger&#39;s &lt;Handheld&gt;"));
        assert!(!svg.contains("<Handheld>"));
        assert!(svg.contains("DS: 12.61"));
    }

    #[test]
    fn tallest_bar_fills_the_plot() {
        let svg = BarChart::platform_sales(Region::Global, &rows()[..1]).to_svg();
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        assert!(svg.contains(&format!(r#"height="{plot_height:.1}""#)));
    }

    #[test]
    fn empty_chart_says_so() {
        let svg = BarChart::platform_sales(Region::Other, &[]).to_svg();
        assert!(svg.contains("No data for the current selection"));
        assert_eq!(svg.matches("<rect").count(), 0);
    }
}
