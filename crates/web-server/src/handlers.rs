use crate::{error::AppError, page, AppState};
use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use axum_extra::extract::Query;
use core_types::{DashboardFilter, PlatformFilter, Region};
use dashboard::{render_in_session, render_pass, view::filter_from_selection, DashboardView};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// The dashboard's two controls, as submitted by the sidebar form.
///
/// `platform` repeats once per selected platform. A request with no
/// `region` is a first visit.
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub region: Option<String>,
    #[serde(default)]
    pub platform: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RegionOption {
    pub label: &'static str,
    pub column: &'static str,
}

/// Runs one render pass on the blocking pool; DuckDB calls are synchronous.
async fn run_pass(state: &AppState, filter: DashboardFilter) -> Result<DashboardView, AppError> {
    let repo = state.repo.clone();
    let view = tokio::task::spawn_blocking(move || render_pass(&repo, &filter)).await??;
    Ok(view)
}

/// # GET /api/platforms
/// Distinct platform names, for the multi-select control.
pub async fn get_platforms(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, AppError> {
    let repo = state.repo.clone();
    let platforms = tokio::task::spawn_blocking(move || repo.list_platforms()).await??;
    Ok(Json(platforms))
}

/// # GET /api/regions
pub async fn get_regions() -> Json<Vec<RegionOption>> {
    Json(
        Region::ALL
            .iter()
            .map(|region| RegionOption {
                label: region.label(),
                column: region.sales_column(),
            })
            .collect(),
    )
}

/// # GET /api/dashboard?region=..&platform=..
/// All four panels for one filter state, as JSON.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Result<Json<DashboardView>, AppError> {
    let filter = filter_from_selection(params.region.as_deref(), params.platform)?;
    let view = run_pass(&state, filter).await?;
    Ok(Json(view))
}

/// # GET /api/charts/platform-sales.svg?region=..&platform=..
pub async fn get_platform_sales_chart(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Result<Response, AppError> {
    let filter = filter_from_selection(params.region.as_deref(), params.platform)?;
    let view = run_pass(&state, filter).await?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], view.chart.to_svg()).into_response())
}

/// # GET /
/// The dashboard page. A failed pass renders an error page with no tables.
pub async fn dashboard_page(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Response {
    match build_page(&state, params).await {
        Ok(html) => Html(html).into_response(),
        Err(err) => (err.status(), Html(page::error_page(&err.public_message()))).into_response(),
    }
}

async fn build_page(state: &AppState, params: FilterParams) -> Result<String, AppError> {
    let region = match params.region.as_deref() {
        Some(label) => label.parse::<Region>()?,
        None => Region::default(),
    };
    let first_visit = params.region.is_none();
    let submitted = params.platform;

    let repo = state.repo.clone();
    let (platforms, selected, view) = tokio::task::spawn_blocking(move || {
        // The control and the panels come from the same session.
        repo.with_session(|session| {
            let platforms = session.list_platforms()?;
            // The multi-select starts with every platform checked.
            let selected: BTreeSet<String> = if first_visit {
                platforms.iter().cloned().collect()
            } else {
                submitted.into_iter().collect()
            };
            let filter =
                DashboardFilter::new(PlatformFilter::from_names(selected.iter().cloned()), region);
            let view = render_in_session(session, &filter)?;
            Ok((platforms, selected, view))
        })
    })
    .await??;

    Ok(page::render_page(&platforms, &selected, &view))
}
