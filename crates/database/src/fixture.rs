//! A small, fixed sales catalogue for tests.
//!
//! The rows cover the edge cases the dashboard cares about: score ties, a
//! title sold on two platforms, null scores, review counts at and below the
//! ranking thresholds, and a platform name containing a quote.

use crate::connection::SalesStore;
use crate::error::DbError;
use crate::repository::SalesRepository;
use duckdb::{params, Connection};
use std::path::Path;

/// `(platform_id, Platform)`.
pub const PLATFORMS: &[(i32, &str)] = &[
    (1, "Wii"),
    (2, "DS"),
    (3, "PS2"),
    (4, "X360"),
    (5, "Tiger's Handheld"),
    (6, "PS3"),
];

/// One `fact_sales` row.
#[derive(Debug, Clone, Copy)]
pub struct FixtureSale {
    pub name: &'static str,
    pub platform_id: i32,
    /// Global, NA, EU, JP, Other.
    pub sales: [f64; 5],
    pub critic_score: Option<f64>,
    pub critic_count: Option<f64>,
    pub user_score: Option<f64>,
    pub user_count: Option<f64>,
}

const fn sale(
    name: &'static str,
    platform_id: i32,
    sales: [f64; 5],
    critic: Option<(f64, f64)>,
    user: Option<(f64, f64)>,
) -> FixtureSale {
    let (critic_score, critic_count) = match critic {
        Some((score, count)) => (Some(score), Some(count)),
        None => (None, None),
    };
    let (user_score, user_count) = match user {
        Some((score, count)) => (Some(score), Some(count)),
        None => (None, None),
    };
    FixtureSale {
        name,
        platform_id,
        sales,
        critic_score,
        critic_count,
        user_score,
        user_count,
    }
}

pub const SALES: &[FixtureSale] = &[
    sale("Wii Sports", 1, [82.53, 41.36, 28.96, 3.77, 8.45], Some((76.0, 51.0)), Some((8.0, 322.0))),
    sale("Mario Kart Wii", 1, [35.52, 15.68, 12.76, 3.79, 3.29], Some((82.0, 73.0)), Some((8.3, 709.0))),
    sale("Wii Sports Resort", 1, [32.77, 15.61, 10.93, 3.28, 2.95], Some((80.0, 73.0)), Some((8.0, 192.0))),
    sale("New Super Mario Bros.", 2, [29.80, 11.28, 9.15, 6.50, 2.88], Some((89.0, 65.0)), Some((8.5, 431.0))),
    sale("Nintendogs", 2, [24.67, 9.05, 10.95, 1.93, 2.74], None, None),
    sale("Brain Age", 2, [20.15, 4.74, 9.20, 4.16, 2.04], Some((77.0, 58.0)), Some((7.9, 50.0))),
    sale("Grand Theft Auto: San Andreas", 3, [20.81, 9.43, 0.40, 0.41, 10.57], Some((95.0, 80.0)), Some((9.0, 1588.0))),
    sale("Gran Turismo 4", 3, [11.66, 3.01, 0.01, 1.10, 7.53], Some((89.0, 74.0)), Some((8.5, 272.0))),
    sale("Kinect Adventures!", 4, [21.82, 14.97, 4.94, 0.24, 1.67], Some((61.0, 45.0)), Some((6.3, 106.0))),
    sale("Grand Theft Auto V", 4, [16.27, 9.66, 5.14, 0.06, 1.41], Some((97.0, 50.0)), Some((8.1, 3994.0))),
    sale("Grand Theft Auto V", 6, [21.04, 7.01, 9.27, 0.97, 4.14], Some((97.0, 50.0)), Some((8.2, 3994.0))),
    sale("Obscure Gem", 1, [0.05, 0.02, 0.01, 0.01, 0.01], Some((99.0, 10.0)), Some((9.9, 20.0))),
    sale("Borderline", 2, [0.10, 0.05, 0.02, 0.02, 0.01], Some((98.0, 15.0)), Some((9.8, 25.0))),
    sale("Apostrophe's Quest", 5, [1.00, 0.50, 0.25, 0.15, 0.10], Some((70.0, 20.0)), Some((7.0, 30.0))),
];

const SCHEMA: &str = "
    CREATE TABLE dim_platforms (
        platform_id INTEGER PRIMARY KEY,
        Platform VARCHAR
    );
    CREATE TABLE fact_sales (
        Name VARCHAR,
        platform_id INTEGER,
        Global_Sales DOUBLE,
        NA_Sales DOUBLE,
        EU_Sales DOUBLE,
        JP_Sales DOUBLE,
        Other_Sales DOUBLE,
        Critic_Score DOUBLE,
        Critic_Count DOUBLE,
        User_Score DOUBLE,
        User_Count DOUBLE
    );
";

/// Creates the star schema and loads [`PLATFORMS`] and [`SALES`].
pub fn seed(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(SCHEMA)?;

    let mut insert_platform = conn.prepare("INSERT INTO dim_platforms VALUES (?, ?)")?;
    for (id, name) in PLATFORMS {
        insert_platform.execute(params![id, name])?;
    }

    let mut insert_sale =
        conn.prepare("INSERT INTO fact_sales VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)")?;
    for row in SALES {
        let [global, na, eu, jp, other] = row.sales;
        insert_sale.execute(params![
            row.name,
            row.platform_id,
            global,
            na,
            eu,
            jp,
            other,
            row.critic_score,
            row.critic_count,
            row.user_score,
            row.user_count,
        ])?;
    }
    Ok(())
}

/// A repository over a seeded in-memory database.
pub fn open_in_memory() -> Result<SalesRepository, DbError> {
    let conn = Connection::open_in_memory()?;
    seed(&conn)?;
    Ok(SalesRepository::new(SalesStore::from_connection(conn)?))
}

/// A repository over an in-memory database built by `sql` alone.
///
/// Lets tests stand up a store whose tables pass the open-time check but
/// whose columns make the dashboard queries fail.
pub fn open_in_memory_with_schema(sql: &str) -> Result<SalesRepository, DbError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(sql)?;
    Ok(SalesRepository::new(SalesStore::from_connection(conn)?))
}

/// Writes a seeded database file at `path`, for tests of the read-only open.
pub fn create_file(path: &Path) -> Result<(), DbError> {
    let conn = Connection::open(path)?;
    seed(&conn)?;
    conn.close().map_err(|(_, e)| DbError::CloseError(e.to_string()))
}
