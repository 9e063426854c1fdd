use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The sales scope a dashboard pass aggregates over.
///
/// Each region maps to exactly one sales column of `fact_sales`. The set is
/// closed: labels are parsed at the boundary and anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Region {
    #[default]
    Global,
    #[serde(rename = "North America")]
    NorthAmerica,
    Europe,
    Japan,
    Other,
}

impl Region {
    /// All regions, in the order the select control lists them.
    pub const ALL: [Region; 5] = [
        Region::Global,
        Region::NorthAmerica,
        Region::Europe,
        Region::Japan,
        Region::Other,
    ];

    /// The label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            Region::Global => "Global",
            Region::NorthAmerica => "North America",
            Region::Europe => "Europe",
            Region::Japan => "Japan",
            Region::Other => "Other",
        }
    }

    /// The `fact_sales` column holding this region's sales figures.
    pub fn sales_column(&self) -> &'static str {
        match self {
            Region::Global => "Global_Sales",
            Region::NorthAmerica => "NA_Sales",
            Region::Europe => "EU_Sales",
            Region::Japan => "JP_Sales",
            Region::Other => "Other_Sales",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Region {
    type Err = CoreError;

    /// Labels are matched exactly; no trimming or case folding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|region| region.label() == s)
            .ok_or_else(|| CoreError::InvalidRegion(s.to_string()))
    }
}
