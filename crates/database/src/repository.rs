use crate::connection::SalesStore;
use crate::error::DbError;
use crate::query::{self, BuiltQuery, PlatformPredicate, ScoreKind};
use core_types::{DashboardFilter, PlatformFilter, PlatformSales, ScoredTitle, TitleSales};
use duckdb::{Connection, Row};

/// The `SalesRepository` provides the dashboard's data access. It
/// encapsulates all SQL and owns the shared store handle.
#[derive(Debug, Clone)]
pub struct SalesRepository {
    store: SalesStore,
}

/// A locked view of the connection, held for the length of one render pass.
pub struct Session<'a> {
    conn: &'a Connection,
}

impl SalesRepository {
    pub fn new(store: SalesStore) -> Self {
        Self { store }
    }

    pub fn into_store(self) -> SalesStore {
        self.store
    }

    /// Releases the underlying connection. See [`SalesStore::close`].
    pub fn close(self) -> Result<(), DbError> {
        self.store.close()
    }

    /// Runs `f` with exclusive use of the connection.
    ///
    /// Everything `f` queries sees the same store state and no other
    /// session runs in between.
    pub fn with_session<T, F>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Session<'_>) -> Result<T, DbError>,
    {
        let guard = self.store.lock();
        let session = Session { conn: &guard };
        f(&session)
    }

    /// Distinct platform names, ascending.
    pub fn list_platforms(&self) -> Result<Vec<String>, DbError> {
        self.with_session(|session| session.list_platforms())
    }

    pub fn top_titles_by_sales(&self, filter: &DashboardFilter) -> Result<Vec<TitleSales>, DbError> {
        self.with_session(|session| session.top_titles_by_sales(filter))
    }

    pub fn top_by_user_score(&self, platforms: &PlatformFilter) -> Result<Vec<ScoredTitle>, DbError> {
        self.with_session(|session| session.top_by_score(ScoreKind::User, platforms))
    }

    pub fn top_by_critic_score(
        &self,
        platforms: &PlatformFilter,
    ) -> Result<Vec<ScoredTitle>, DbError> {
        self.with_session(|session| session.top_by_score(ScoreKind::Critic, platforms))
    }

    pub fn platform_sales(&self, filter: &DashboardFilter) -> Result<Vec<PlatformSales>, DbError> {
        self.with_session(|session| session.platform_sales(filter))
    }
}

impl Session<'_> {
    pub fn list_platforms(&self) -> Result<Vec<String>, DbError> {
        self.fetch(&query::list_platforms(), |row| row.get(0))
    }

    pub fn top_titles_by_sales(&self, filter: &DashboardFilter) -> Result<Vec<TitleSales>, DbError> {
        let predicate = PlatformPredicate::from_filter(&filter.platforms);
        self.fetch(&query::top_titles_by_sales(filter.region, &predicate), |row| {
            Ok(TitleSales {
                name: row.get(0)?,
                total_sales: row.get(1)?,
            })
        })
    }

    pub fn top_by_score(
        &self,
        kind: ScoreKind,
        platforms: &PlatformFilter,
    ) -> Result<Vec<ScoredTitle>, DbError> {
        let predicate = PlatformPredicate::from_filter(platforms);
        self.fetch(&query::top_by_score(kind, &predicate), |row| {
            Ok(ScoredTitle {
                name: row.get(0)?,
                platform: row.get(1)?,
                score: row.get(2)?,
                review_count: row.get(3)?,
            })
        })
    }

    pub fn platform_sales(&self, filter: &DashboardFilter) -> Result<Vec<PlatformSales>, DbError> {
        let predicate = PlatformPredicate::from_filter(&filter.platforms);
        self.fetch(&query::platform_sales(filter.region, &predicate), |row| {
            Ok(PlatformSales {
                platform: row.get(0)?,
                total_sales: row.get(1)?,
            })
        })
    }

    fn fetch<T, F>(&self, query: &BuiltQuery, map: F) -> Result<Vec<T>, DbError>
    where
        F: FnMut(&Row<'_>) -> duckdb::Result<T>,
    {
        tracing::debug!(sql = %query.sql, params = ?query.params, "Executing query.");
        let mut stmt = self.conn.prepare(&query.sql)?;
        let rows = stmt.query_map(duckdb::params_from_iter(query.params.iter()), map)?;
        let collected = rows.collect::<Result<Vec<T>, _>>()?;
        Ok(collected)
    }
}
