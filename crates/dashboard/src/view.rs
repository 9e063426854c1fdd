use crate::chart::BarChart;
use crate::error::DashboardError;
use core_types::{DashboardFilter, PlatformFilter, PlatformSales, Region, ScoredTitle, TitleSales};
use database::query::ScoreKind;
use database::{DbError, SalesRepository, Session, TOP_N};
use serde::Serialize;
use std::time::Instant;

/// One titled table of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel<T> {
    pub title: String,
    pub rows: Vec<T>,
}

impl<T> Panel<T> {
    fn new(title: String, rows: Vec<T>) -> Self {
        Self { title, rows }
    }
}

/// Everything one render pass displays, built from a single filter state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub filter: DashboardFilter,
    pub top_titles: Panel<TitleSales>,
    pub top_user_score: Panel<ScoredTitle>,
    pub top_critic_score: Panel<ScoredTitle>,
    pub platform_sales: Panel<PlatformSales>,
    pub chart: BarChart,
}

/// Builds the filter state from raw control values.
///
/// A missing region means the default (`Global`). An unknown region label is
/// rejected rather than defaulted.
pub fn filter_from_selection<I>(
    region: Option<&str>,
    platforms: I,
) -> Result<DashboardFilter, DashboardError>
where
    I: IntoIterator<Item = String>,
{
    let region = match region {
        Some(label) => label.parse::<Region>()?,
        None => Region::default(),
    };
    Ok(DashboardFilter::new(
        PlatformFilter::from_names(platforms),
        region,
    ))
}

/// Runs the four dashboard queries for `filter` and assembles the view.
///
/// The queries run back to back in one session, so every panel sees the same
/// filter and the same store state. The first failure aborts the pass.
pub fn render_pass(
    repo: &SalesRepository,
    filter: &DashboardFilter,
) -> Result<DashboardView, DashboardError> {
    repo.with_session(|session| render_in_session(session, filter))
        .map_err(|e| {
            tracing::error!(error = %e, region = %filter.region, "Render pass failed.");
            e.into()
        })
}

/// The body of a render pass, for callers that already hold a session and
/// need to read more than the four panels under the same lock.
pub fn render_in_session(
    session: &Session<'_>,
    filter: &DashboardFilter,
) -> Result<DashboardView, DbError> {
    let started = Instant::now();
    let region = filter.region;

    let top_titles = session.top_titles_by_sales(filter)?;
    let top_user = session.top_by_score(ScoreKind::User, &filter.platforms)?;
    let top_critic = session.top_by_score(ScoreKind::Critic, &filter.platforms)?;
    let per_platform = session.platform_sales(filter)?;

    tracing::info!(
        %region,
        platforms = filter.platforms.selected_count(),
        top_titles = top_titles.len(),
        top_user = top_user.len(),
        top_critic = top_critic.len(),
        platforms_with_sales = per_platform.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Render pass complete."
    );

    let chart = BarChart::platform_sales(region, &per_platform);
    Ok(DashboardView {
        filter: filter.clone(),
        top_titles: Panel::new(format!("Top {TOP_N} Games by {region} Sales"), top_titles),
        top_user_score: Panel::new(format!("Top {TOP_N} Games by User Score"), top_user),
        top_critic_score: Panel::new(format!("Top {TOP_N} Games by Critic Score"), top_critic),
        platform_sales: Panel::new(format!("Sales by Platform ({region})"), per_platform),
        chart,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::fixture;

    fn platforms_of(view: &DashboardView) -> Vec<Option<String>> {
        let mut seen: Vec<Option<String>> = Vec::new();
        seen.extend(view.top_user_score.rows.iter().map(|r| r.platform.clone()));
        seen.extend(view.top_critic_score.rows.iter().map(|r| r.platform.clone()));
        seen.extend(view.platform_sales.rows.iter().map(|r| r.platform.clone()));
        seen
    }

    #[test]
    fn japan_with_wii_and_ds() {
        let repo = fixture::open_in_memory().unwrap();
        let filter = filter_from_selection(
            Some("Japan"),
            vec!["Wii".to_string(), "DS".to_string()],
        )
        .unwrap();
        let view = render_pass(&repo, &filter).unwrap();

        assert_eq!(view.top_titles.title, "Top 5 Games by Japan Sales");
        assert_eq!(view.platform_sales.title, "Sales by Platform (Japan)");
        assert_eq!(view.chart.title, "Sales by Platform - Japan");
        for platform in platforms_of(&view) {
            assert!(matches!(platform.as_deref(), Some("Wii") | Some("DS")));
        }
        let total: f64 = view.platform_sales.rows.iter().map(|r| r.total_sales).sum();
        assert!((total - (10.85 + 12.61)).abs() < 1e-9);
        assert_eq!(view.top_titles.rows[0].name, "New Super Mario Bros.");
    }

    #[test]
    fn global_with_no_platforms_equals_unrestricted() {
        let repo = fixture::open_in_memory().unwrap();
        let none = filter_from_selection(Some("Global"), Vec::new()).unwrap();
        let all = filter_from_selection(Some("Global"), repo.list_platforms().unwrap()).unwrap();

        let none_view = render_pass(&repo, &none).unwrap();
        let all_view = render_pass(&repo, &all).unwrap();
        assert_eq!(none_view.top_titles, all_view.top_titles);
        assert_eq!(none_view.top_user_score, all_view.top_user_score);
        assert_eq!(none_view.top_critic_score, all_view.top_critic_score);
        assert_eq!(none_view.platform_sales, all_view.platform_sales);
        assert_eq!(none_view.top_titles.rows.len(), 5);
    }

    #[test]
    fn top_panels_never_exceed_five_rows() {
        let repo = fixture::open_in_memory().unwrap();
        for region in Region::ALL {
            let view = render_pass(&repo, &DashboardFilter::new(PlatformFilter::all(), region)).unwrap();
            assert!(view.top_titles.rows.len() <= 5);
            assert!(view.top_user_score.rows.len() <= 5);
            assert!(view.top_critic_score.rows.len() <= 5);
            assert!(
                view.top_titles
                    .rows
                    .windows(2)
                    .all(|w| w[0].total_sales >= w[1].total_sales)
            );
            assert_eq!(view.chart.bars.len(), view.platform_sales.rows.len());
        }
    }

    #[test]
    fn missing_region_defaults_to_global_but_unknown_is_rejected() {
        let filter = filter_from_selection(None, Vec::new()).unwrap();
        assert_eq!(filter.region, Region::Global);
        assert!(filter.platforms.is_unrestricted());

        let err = filter_from_selection(Some("Antarctica"), Vec::new()).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidRegion(_)));
    }

    #[test]
    fn no_matching_platforms_is_an_empty_view_not_an_error() {
        let repo = fixture::open_in_memory().unwrap();
        let filter = filter_from_selection(Some("Europe"), vec!["Saturn".to_string()]).unwrap();
        let view = render_pass(&repo, &filter).unwrap();
        assert!(view.top_titles.rows.is_empty());
        assert!(view.platform_sales.rows.is_empty());
        assert!(view.chart.bars.is_empty());
    }

    #[test]
    fn query_failure_aborts_the_pass() {
        let repo = fixture::open_in_memory_with_schema(
            "CREATE TABLE dim_platforms (platform_id INTEGER, Platform VARCHAR);
             CREATE TABLE fact_sales (Name VARCHAR, platform_id INTEGER);",
        )
        .unwrap();
        let err = render_pass(&repo, &DashboardFilter::default()).unwrap_err();
        assert!(matches!(err, DashboardError::StoreUnavailable(_)));
    }

    #[test]
    fn session_reads_platforms_and_view_together() {
        let repo = fixture::open_in_memory().unwrap();
        let (platforms, view) = repo
            .with_session(|session| {
                let platforms = session.list_platforms()?;
                let view = render_in_session(session, &DashboardFilter::default())?;
                Ok((platforms, view))
            })
            .unwrap();
        assert_eq!(platforms.len(), fixture::PLATFORMS.len());
        assert_eq!(view, render_pass(&repo, &DashboardFilter::default()).unwrap());
    }

    #[test]
    fn view_serializes_region_label() {
        let repo = fixture::open_in_memory().unwrap();
        let filter = filter_from_selection(Some("North America"), Vec::new()).unwrap();
        let view = render_pass(&repo, &filter).unwrap();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["filter"]["region"], "North America");
        assert_eq!(json["top_titles"]["rows"][0]["name"], "Wii Sports");
    }
}
