//! Terminal rendering of a `DashboardView`.

use crate::chart::UNKNOWN_PLATFORM;
use crate::format_sales;
use crate::view::{DashboardView, Panel};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use core_types::{PlatformSales, ScoredTitle, TitleSales};

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.iter().map(|h| Cell::new(h)));
    table
}

fn number(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

pub fn title_sales_table(panel: &Panel<TitleSales>) -> Table {
    let mut table = new_table(&["Name", "Total_Sales"]);
    for row in &panel.rows {
        table.add_row(vec![Cell::new(&row.name), number(format_sales(row.total_sales))]);
    }
    table
}

/// `score_header` and `count_header` name the score columns, e.g.
/// `User_Score` / `User_Count`.
pub fn scored_title_table(
    panel: &Panel<ScoredTitle>,
    score_header: &str,
    count_header: &str,
) -> Table {
    let mut table = new_table(&["Name", "Platform", score_header, count_header]);
    for row in &panel.rows {
        table.add_row(vec![
            Cell::new(&row.name),
            Cell::new(row.platform.as_deref().unwrap_or(UNKNOWN_PLATFORM)),
            number(row.score.to_string()),
            number(row.review_count.to_string()),
        ]);
    }
    table
}

pub fn platform_sales_table(panel: &Panel<PlatformSales>) -> Table {
    let mut table = new_table(&["Platform", "Total_Sales"]);
    for row in &panel.rows {
        table.add_row(vec![
            Cell::new(row.platform.as_deref().unwrap_or(UNKNOWN_PLATFORM)),
            number(format_sales(row.total_sales)),
        ]);
    }
    table
}

/// All four panels, each under its title, separated by blank lines.
pub fn render_view(view: &DashboardView) -> String {
    let selection = if view.filter.platforms.is_unrestricted() {
        "all platforms".to_string()
    } else {
        view.filter.platforms.names().collect::<Vec<_>>().join(", ")
    };

    let sections = [
        (&view.top_titles.title, title_sales_table(&view.top_titles)),
        (
            &view.top_user_score.title,
            scored_title_table(&view.top_user_score, "User_Score", "User_Count"),
        ),
        (
            &view.top_critic_score.title,
            scored_title_table(&view.top_critic_score, "Critic_Score", "Critic_Count"),
        ),
        (&view.platform_sales.title, platform_sales_table(&view.platform_sales)),
    ];

    let mut out = format!(
        "Region: {}\nPlatforms: {}\n",
        view.filter.region, selection
    );
    for (title, table) in sections {
        out.push('\n');
        out.push_str(title);
        out.push('\n');
        out.push_str(&table.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{filter_from_selection, render_pass};
    use database::fixture;

    #[test]
    fn report_lists_every_panel() {
        let repo = fixture::open_in_memory().unwrap();
        let filter = filter_from_selection(Some("Japan"), vec!["Wii".into(), "DS".into()]).unwrap();
        let text = render_view(&render_pass(&repo, &filter).unwrap());

        assert!(text.starts_with("Region: Japan\nPlatforms: DS, Wii\n"));
        assert!(text.contains("Top 5 Games by Japan Sales"));
        assert!(text.contains("Top 5 Games by User Score"));
        assert!(text.contains("Top 5 Games by Critic Score"));
        assert!(text.contains("Sales by Platform (Japan)"));
        assert!(text.contains("12.61"));
        assert!(text.contains("Critic_Count"));
    }

    #[test]
    fn sales_are_shown_with_two_decimals() {
        let panel = Panel {
            title: "t".to_string(),
            rows: vec![TitleSales { name: "Tetris".to_string(), total_sales: 30.0 }],
        };
        let rendered = title_sales_table(&panel).to_string();
        assert!(rendered.contains("30.00"));
    }
}
