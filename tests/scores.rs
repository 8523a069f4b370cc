use amtools::scores::{
    SCORE_COLUMNS, ScoresError, init_schema, load_week_scores, open_ranking_db, render_all,
};
use rusqlite::{Connection, params};

fn insert_week(conn: &Connection, activity: &str, week: i64, location: &str, s00: f64, s13: f64) {
    conn.execute(
        "INSERT INTO WeekScores (activity, year, week, location, s00, s13) VALUES (?1, 2013, ?2, ?3, ?4, ?5)",
        params![activity, week, location, s00, s13],
    )
    .expect("insert week");
}

#[test]
fn sums_scores_per_activity() {
    let conn = Connection::open_in_memory().expect("db");
    init_schema(&conn).expect("schema");

    insert_week(&conn, "alpha", 1, "home", 1.0, 0.5);
    insert_week(&conn, "alpha", 2, "home", 2.0, 0.25);
    insert_week(&conn, "beta", 1, "office", 4.0, 0.0);

    let rows = load_week_scores(&conn, None).expect("query");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].activity.as_deref(), Some("alpha"));
    assert_eq!(rows[1].activity.as_deref(), Some("beta"));

    assert_eq!(rows[0].scores.len(), SCORE_COLUMNS);
    assert_eq!(rows[0].scores[0], Some(3.0));
    // s13 is day 1, slot 3
    assert_eq!(rows[0].scores[8 + 3], Some(0.75));
    assert_eq!(rows[0].scores[1], Some(0.0));
    assert_eq!(rows[1].scores[0], Some(4.0));
}

#[test]
fn filters_by_location() {
    let conn = Connection::open_in_memory().expect("db");
    init_schema(&conn).expect("schema");

    insert_week(&conn, "alpha", 1, "home", 1.0, 0.0);
    insert_week(&conn, "alpha", 1, "office", 10.0, 0.0);
    insert_week(&conn, "beta", 1, "office", 4.0, 0.0);

    let rows = load_week_scores(&conn, Some("home")).expect("query");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].activity.as_deref(), Some("alpha"));
    assert_eq!(rows[0].scores[0], Some(1.0));
}

#[test]
fn renders_one_block_per_activity_in_order() {
    let conn = Connection::open_in_memory().expect("db");
    init_schema(&conn).expect("schema");

    insert_week(&conn, "alpha", 1, "home", 1.0, 0.0);
    insert_week(&conn, "beta", 1, "home", 2.5, 0.0);

    let rows = load_week_scores(&conn, None).expect("query");
    let text = render_all(&rows);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "% alpha");
    assert!(lines[1].starts_with("Y 0 = [ 1.0 , 0.0 ,"));
    assert!(lines[1].ends_with(" 0.0 ,  0 ];"));
    assert_eq!(lines[2], "% beta");
    assert!(lines[3].starts_with("Y 1 = [ 2.5 ,"));
    assert_eq!(lines[1].matches(" ,").count(), SCORE_COLUMNS);
}

#[test]
fn null_sums_render_as_zero() {
    let conn = Connection::open_in_memory().expect("db");
    init_schema(&conn).expect("schema");
    conn.execute(
        "INSERT INTO WeekScores (activity, year, week, s00) VALUES ('gamma', 2013, 1, NULL)",
        [],
    )
    .expect("insert");

    let rows = load_week_scores(&conn, None).expect("query");
    assert_eq!(rows[0].scores[0], None);
    assert!(render_all(&rows).contains("Y 0 = [ 0 , 0.0 ,"));
}

#[test]
fn null_activity_keeps_other_blocks() {
    let conn = Connection::open_in_memory().expect("db");
    init_schema(&conn).expect("schema");
    conn.execute(
        "INSERT INTO WeekScores (activity, year, week, s00) VALUES (NULL, 2013, 1, 1.0)",
        [],
    )
    .expect("insert null activity");
    conn.execute(
        "INSERT INTO WeekScores (activity, year, week, s00) VALUES ('work', 2013, 1, 2.0)",
        [],
    )
    .expect("insert work");

    let rows = load_week_scores(&conn, None).expect("query");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].activity, None);
    assert_eq!(rows[1].activity.as_deref(), Some("work"));

    let text = render_all(&rows);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "% None");
    assert!(lines[1].starts_with("Y 0 = [ 1.0 ,"));
    assert_eq!(lines[2], "% work");
    assert!(lines[3].starts_with("Y 1 = [ 2.0 ,"));
}

#[test]
fn fractional_sums_print_rounded() {
    let conn = Connection::open_in_memory().expect("db");
    init_schema(&conn).expect("schema");
    insert_week(&conn, "alpha", 1, "home", 0.1, 0.0);
    insert_week(&conn, "alpha", 2, "home", 0.2, 0.0);

    let rows = load_week_scores(&conn, None).expect("query");
    assert!(render_all(&rows).contains("Y 0 = [ 0.3 , 0.0 ,"));
}

#[test]
fn empty_table_renders_nothing() {
    let conn = Connection::open_in_memory().expect("db");
    init_schema(&conn).expect("schema");

    let rows = load_week_scores(&conn, None).expect("query");
    assert!(rows.is_empty());
    assert_eq!(render_all(&rows), "");
}

#[test]
fn opens_existing_database_read_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("database");
    {
        let conn = Connection::open(&path).expect("create");
        init_schema(&conn).expect("schema");
        insert_week(&conn, "alpha", 1, "home", 1.0, 0.0);
    }

    let conn = open_ranking_db(&path).expect("open");
    let rows = load_week_scores(&conn, None).expect("query");
    assert_eq!(rows.len(), 1);

    let err = conn
        .execute("DELETE FROM WeekScores", [])
        .expect_err("read-only");
    assert!(err.to_string().contains("readonly") || err.to_string().contains("read-only"));
}

#[test]
fn missing_database_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent");
    let err = open_ranking_db(&path).expect_err("missing");
    assert!(matches!(err, ScoresError::MissingDatabase { .. }));
    assert!(!path.exists());
}

#[test]
fn missing_table_is_sqlite_error() {
    let conn = Connection::open_in_memory().expect("db");
    let err = load_week_scores(&conn, None).expect_err("no table");
    assert!(matches!(err, ScoresError::Sqlite { .. }));
}
