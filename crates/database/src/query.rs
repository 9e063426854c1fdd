//! SQL assembly for the dashboard panels.
//!
//! Platform names are never spliced into SQL text; they are bound as `?`
//! parameters. The only identifier that varies between statements is the
//! sales column, and that comes from the closed `Region` enumeration.

use core_types::{PlatformFilter, Region};

/// Number of rows in each "top" panel.
pub const TOP_N: usize = 5;
/// A user-score row needs strictly more reviews than this to be ranked.
pub const USER_REVIEW_THRESHOLD: i64 = 25;
/// A critic-score row needs strictly more reviews than this to be ranked.
pub const CRITIC_REVIEW_THRESHOLD: i64 = 15;

const FROM_CLAUSE: &str =
    "FROM fact_sales f\nLEFT JOIN dim_platforms pl ON f.platform_id = pl.platform_id";

/// A statement ready to be prepared, with its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<String>,
}

/// The `AND pl.Platform IN (...)` fragment shared by every panel of a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformPredicate {
    fragment: String,
    params: Vec<String>,
}

impl PlatformPredicate {
    /// An unrestricted filter yields an empty fragment, so the query covers
    /// every platform.
    pub fn from_filter(filter: &PlatformFilter) -> Self {
        if filter.is_unrestricted() {
            return Self {
                fragment: String::new(),
                params: Vec::new(),
            };
        }
        let params: Vec<String> = filter.names().map(str::to_string).collect();
        let placeholders = vec!["?"; params.len()].join(", ");
        Self {
            fragment: format!("AND pl.Platform IN ({placeholders})"),
            params,
        }
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}

/// Which review score a ranking panel uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreKind {
    User,
    Critic,
}

impl ScoreKind {
    pub fn score_column(&self) -> &'static str {
        match self {
            ScoreKind::User => "User_Score",
            ScoreKind::Critic => "Critic_Score",
        }
    }

    pub fn count_column(&self) -> &'static str {
        match self {
            ScoreKind::User => "User_Count",
            ScoreKind::Critic => "Critic_Count",
        }
    }

    pub fn review_threshold(&self) -> i64 {
        match self {
            ScoreKind::User => USER_REVIEW_THRESHOLD,
            ScoreKind::Critic => CRITIC_REVIEW_THRESHOLD,
        }
    }
}

/// Distinct platform names for the multi-select control.
pub fn list_platforms() -> BuiltQuery {
    BuiltQuery {
        sql: "SELECT DISTINCT Platform FROM dim_platforms WHERE Platform IS NOT NULL ORDER BY Platform"
            .to_string(),
        params: Vec::new(),
    }
}

/// Top titles by summed sales in `region`. Ties fall back to title order.
pub fn top_titles_by_sales(region: Region, platforms: &PlatformPredicate) -> BuiltQuery {
    let column = region.sales_column();
    let sql = format!(
        "SELECT\n    f.Name,\n    CAST(ROUND(COALESCE(SUM(f.{column}), 0), 2) AS DOUBLE) AS Total_Sales\n\
         {FROM_CLAUSE}\n\
         WHERE 1=1 {predicate}\n\
         GROUP BY f.Name\n\
         ORDER BY Total_Sales DESC, f.Name ASC\n\
         LIMIT {TOP_N}",
        predicate = platforms.fragment(),
    );
    BuiltQuery {
        sql,
        params: platforms.params().to_vec(),
    }
}

/// Top (title, platform) rows by review score, then by review count.
/// Equal rows fall back to title, then platform order.
pub fn top_by_score(kind: ScoreKind, platforms: &PlatformPredicate) -> BuiltQuery {
    let score = kind.score_column();
    let count = kind.count_column();
    let sql = format!(
        "SELECT\n    f.Name,\n    pl.Platform,\n    CAST(f.{score} AS DOUBLE) AS score,\n    CAST(f.{count} AS BIGINT) AS review_count\n\
         {FROM_CLAUSE}\n\
         WHERE f.{score} IS NOT NULL\n\
         AND f.{count} > {threshold}\n\
         {predicate}\n\
         ORDER BY score DESC, review_count DESC, f.Name ASC, pl.Platform ASC NULLS LAST\n\
         LIMIT {TOP_N}",
        threshold = kind.review_threshold(),
        predicate = platforms.fragment(),
    );
    BuiltQuery {
        sql,
        params: platforms.params().to_vec(),
    }
}

/// Summed sales per platform in `region`, largest first. Not limited.
pub fn platform_sales(region: Region, platforms: &PlatformPredicate) -> BuiltQuery {
    let column = region.sales_column();
    let sql = format!(
        "SELECT\n    pl.Platform,\n    CAST(ROUND(COALESCE(SUM(f.{column}), 0), 2) AS DOUBLE) AS Total_Sales\n\
         {FROM_CLAUSE}\n\
         WHERE 1=1 {predicate}\n\
         GROUP BY pl.Platform\n\
         ORDER BY Total_Sales DESC, pl.Platform ASC NULLS LAST",
        predicate = platforms.fragment(),
    );
    BuiltQuery {
        sql,
        params: platforms.params().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrestricted_filter_adds_no_predicate() {
        let predicate = PlatformPredicate::from_filter(&PlatformFilter::all());
        assert_eq!(predicate.fragment(), "");
        assert!(predicate.params().is_empty());

        let query = top_titles_by_sales(Region::Global, &predicate);
        assert!(!query.sql.contains("IN ("));
        assert!(query.params.is_empty());
    }

    #[test]
    fn names_are_bound_not_spliced() {
        let filter = PlatformFilter::from_names(["Wii", "DS", "x') OR 1=1 --"]);
        let predicate = PlatformPredicate::from_filter(&filter);
        assert_eq!(predicate.fragment(), "AND pl.Platform IN (?, ?, ?)");
        assert_eq!(predicate.params(), ["DS", "Wii", "x') OR 1=1 --"]);

        let query = platform_sales(Region::Japan, &predicate);
        assert!(!query.sql.contains("OR 1=1"));
        assert_eq!(query.sql.matches('?').count(), 3);
        assert_eq!(query.params.len(), 3);
    }

    #[test]
    fn region_selects_the_sales_column() {
        let predicate = PlatformPredicate::from_filter(&PlatformFilter::all());
        for region in Region::ALL {
            let column = format!("SUM(f.{})", region.sales_column());
            assert!(top_titles_by_sales(region, &predicate).sql.contains(&column));
            assert!(platform_sales(region, &predicate).sql.contains(&column));
        }
    }

    #[test]
    fn score_queries_use_their_thresholds() {
        let predicate = PlatformPredicate::from_filter(&PlatformFilter::all());
        let user = top_by_score(ScoreKind::User, &predicate).sql;
        assert!(user.contains("f.User_Score IS NOT NULL"));
        assert!(user.contains("f.User_Count > 25"));
        let critic = top_by_score(ScoreKind::Critic, &predicate).sql;
        assert!(critic.contains("f.Critic_Score IS NOT NULL"));
        assert!(critic.contains("f.Critic_Count > 15"));
        assert!(critic.ends_with("LIMIT 5"));
    }

    #[test]
    fn score_ranking_ends_on_platform() {
        // The same title on two platforms can tie on score, count and name.
        let predicate = PlatformPredicate::from_filter(&PlatformFilter::all());
        for kind in [ScoreKind::User, ScoreKind::Critic] {
            let sql = top_by_score(kind, &predicate).sql;
            assert!(
                sql.contains("ORDER BY score DESC, review_count DESC, f.Name ASC, pl.Platform ASC NULLS LAST\n"),
                "{sql}"
            );
        }
    }

    #[test]
    fn every_statement_is_a_select() {
        let predicate = PlatformPredicate::from_filter(&PlatformFilter::from_names(["PS2"]));
        let queries = [
            list_platforms(),
            top_titles_by_sales(Region::Europe, &predicate),
            top_by_score(ScoreKind::User, &predicate),
            top_by_score(ScoreKind::Critic, &predicate),
            platform_sales(Region::Other, &predicate),
        ];
        for query in queries {
            assert!(query.sql.trim_start().starts_with("SELECT"), "{}", query.sql);
        }
    }
}
