use core_types::{DashboardFilter, PlatformFilter, Region};
use database::{fixture, DbError, SalesRepository, SalesStore};
use duckdb::Connection;

#[test]
fn opens_file_read_only_and_answers_queries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("video_games.db");
    fixture::create_file(&path).unwrap();

    let store = SalesStore::open(&path).unwrap();
    assert_eq!(store.path(), Some(path.as_path()));
    let repo = SalesRepository::new(store);

    assert_eq!(
        repo.list_platforms().unwrap(),
        vec!["DS", "PS2", "PS3", "Tiger's Handheld", "Wii", "X360"]
    );

    let filter = DashboardFilter::new(PlatformFilter::from_names(["Wii", "DS"]), Region::Japan);
    let rows = repo.platform_sales(&filter).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].platform.as_deref(), Some("DS"));
    assert!((rows[0].total_sales - 12.61).abs() < 1e-9);
    assert!((rows[1].total_sales - 10.85).abs() < 1e-9);

    // Null scores never reach the rankings.
    let user = repo.top_by_user_score(&PlatformFilter::all()).unwrap();
    assert!(user.iter().all(|row| row.name != "Nintendogs"));

    repo.close().unwrap();
}

#[test]
fn file_without_fact_table_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE dim_platforms (platform_id INTEGER, Platform VARCHAR);
         INSERT INTO dim_platforms VALUES (1, 'Wii'), (2, 'DS');",
    )
    .unwrap();
    conn.close().map_err(|(_, e)| e).unwrap();

    let err = SalesStore::open(&path).unwrap_err();
    assert!(matches!(err, DbError::MissingTable("fact_sales")));
}

#[test]
fn store_can_be_reopened_after_close() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("video_games.db");
    fixture::create_file(&path).unwrap();

    SalesStore::open(&path).unwrap().close().unwrap();
    let repo = SalesRepository::new(SalesStore::open(&path).unwrap());
    assert_eq!(repo.list_platforms().unwrap().len(), fixture::PLATFORMS.len());
}
