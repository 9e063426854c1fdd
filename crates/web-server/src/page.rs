//! Server-side HTML for the dashboard page.

use core_types::Region;
use dashboard::chart::{escape, UNKNOWN_PLATFORM};
use dashboard::{format_sales, DashboardView};
use std::collections::BTreeSet;
use std::fmt::Write as _;

const PAGE_TITLE: &str = "Video Game Sales Dashboard";
const HEADING: &str = "Video Game Sales Analytics";

const STYLE: &str = "
body { margin: 0; font-family: sans-serif; display: flex; color: #262730; }
aside { width: 260px; padding: 1.5rem; background: #f0f2f6; min-height: 100vh; box-sizing: border-box; }
aside select { width: 100%; margin-bottom: 1rem; }
main { flex: 1; padding: 1.5rem 2.5rem; }
table { border-collapse: collapse; width: 100%; margin-bottom: 1rem; }
th, td { border: 1px solid #ddd; padding: 0.35rem 0.6rem; text-align: left; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
.empty { color: #888; font-style: italic; }
.error { padding: 1rem; background: #ffe4e4; border: 1px solid #e57373; }
";

fn document(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{PAGE_TITLE}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n"
    )
}

/// The full dashboard: filter sidebar plus the four panels of `view`.
///
/// `selected` is what the multi-select shows as checked. It may be empty
/// while `view` covers every platform.
pub fn render_page(platforms: &[String], selected: &BTreeSet<String>, view: &DashboardView) -> String {
    let mut body = String::new();
    body.push_str(&sidebar(platforms, selected, view.filter.region));

    body.push_str("<main>\n");
    let _ = writeln!(body, "<h1>{HEADING}</h1>");

    let top_titles = view
        .top_titles
        .rows
        .iter()
        .map(|row| vec![Cell::text(&row.name), Cell::number(format_sales(row.total_sales))])
        .collect();
    section(&mut body, &view.top_titles.title, &["Name", "Total_Sales"], top_titles);

    for (panel, score, count) in [
        (&view.top_user_score, "User_Score", "User_Count"),
        (&view.top_critic_score, "Critic_Score", "Critic_Count"),
    ] {
        let rows = panel
            .rows
            .iter()
            .map(|row| {
                vec![
                    Cell::text(&row.name),
                    Cell::text(row.platform.as_deref().unwrap_or(UNKNOWN_PLATFORM)),
                    Cell::number(row.score.to_string()),
                    Cell::number(row.review_count.to_string()),
                ]
            })
            .collect();
        section(&mut body, &panel.title, &["Name", "Platform", score, count], rows);
    }

    let per_platform = view
        .platform_sales
        .rows
        .iter()
        .map(|row| {
            vec![
                Cell::text(row.platform.as_deref().unwrap_or(UNKNOWN_PLATFORM)),
                Cell::number(format_sales(row.total_sales)),
            ]
        })
        .collect();
    section(&mut body, &view.platform_sales.title, &["Platform", "Total_Sales"], per_platform);
    body.push_str(&view.chart.to_svg());

    body.push_str("</main>\n");
    document(&body)
}

/// A page carrying only the error, so no stale or partial tables are shown.
pub fn error_page(message: &str) -> String {
    document(&format!(
        "<main>\n<h1>{HEADING}</h1>\n<div class=\"error\" role=\"alert\">{}</div>\n<p><a href=\"/\">Reset filters</a></p>\n</main>\n",
        escape(message)
    ))
}

fn sidebar(platforms: &[String], selected: &BTreeSet<String>, region: Region) -> String {
    let mut html = String::from("<aside>\n<h2>Filters</h2>\n<form method=\"get\" action=\"/\">\n");

    let _ = writeln!(
        html,
        "<label for=\"platform\">Select Platforms</label>\n<select id=\"platform\" name=\"platform\" multiple size=\"{}\">",
        platforms.len().clamp(4, 16)
    );
    for platform in platforms {
        let name = escape(platform);
        let mark = if selected.contains(platform) { " selected" } else { "" };
        let _ = writeln!(html, "<option value=\"{name}\"{mark}>{name}</option>");
    }
    html.push_str("</select>\n");

    html.push_str("<label for=\"region\">Select Region</label>\n<select id=\"region\" name=\"region\">\n");
    for option in Region::ALL {
        let mark = if option == region { " selected" } else { "" };
        let _ = writeln!(html, "<option value=\"{0}\"{mark}>{0}</option>", option.label());
    }
    html.push_str("</select>\n<button type=\"submit\">Apply</button>\n</form>\n</aside>\n");
    html
}

struct Cell {
    text: String,
    numeric: bool,
}

impl Cell {
    fn text(value: &str) -> Self {
        Self { text: escape(value), numeric: false }
    }

    fn number(value: String) -> Self {
        Self { text: value, numeric: true }
    }
}

fn section(html: &mut String, title: &str, header: &[&str], rows: Vec<Vec<Cell>>) {
    let _ = writeln!(html, "<section>\n<h2>{}</h2>", escape(title));
    if rows.is_empty() {
        html.push_str("<p class=\"empty\">No rows match the current filters.</p>\n</section>\n");
        return;
    }
    html.push_str("<table>\n<thead><tr>");
    for column in header {
        let _ = write!(html, "<th>{column}</th>");
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            let class = if cell.numeric { " class=\"num\"" } else { "" };
            let _ = write!(html, "<td{class}>{}</td>", cell.text);
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n</section>\n");
}
