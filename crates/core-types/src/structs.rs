use crate::enums::Region;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The set of platform names a render pass is restricted to.
///
/// An empty set means "no restriction", never "no platforms". Names are
/// compared with exact string equality against `dim_platforms.Platform`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformFilter {
    names: BTreeSet<String>,
}

impl PlatformFilter {
    /// A filter that applies no restriction.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.names.is_empty()
    }

    /// The selected names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// How many platforms are selected; zero when unrestricted.
    pub fn selected_count(&self) -> usize {
        self.names.len()
    }

    /// Whether a row on `platform` passes this filter.
    pub fn allows(&self, platform: &str) -> bool {
        self.is_unrestricted() || self.names.contains(platform)
    }
}

/// The complete filter state of one render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardFilter {
    pub platforms: PlatformFilter,
    pub region: Region,
}

impl DashboardFilter {
    pub fn new(platforms: PlatformFilter, region: Region) -> Self {
        Self { platforms, region }
    }
}

/// A title with its summed sales for the selected region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleSales {
    pub name: String,
    /// Millions of units, rounded to 2 decimals.
    pub total_sales: f64,
}

/// A (title, platform) row ranked by a review score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTitle {
    pub name: String,
    /// `None` when the fact row references an unknown platform id.
    pub platform: Option<String>,
    pub score: f64,
    pub review_count: i64,
}

/// Summed sales of one platform for the selected region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSales {
    pub platform: Option<String>,
    /// Millions of units, rounded to 2 decimals.
    pub total_sales: f64,
}
