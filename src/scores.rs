//! Activity-ranking week scores.
//!
//! The ranking service stores one `WeekScores` row per activity, year, week
//! and location. Each row holds 56 scores `sDS`: day `D` in `0..7` and
//! three-hour slot `S` in `0..8`. This module sums them per activity and
//! renders each activity as a numeric literal block:
//!
//! ```text
//! % <activity>
//! Y 0 = [ 1.0 , 0.5 , ... ,  0 ];
//! ```
//!
//! # Key Functions
//!
//! - [`open_ranking_db`]: Open the database read-only
//! - [`load_week_scores`]: Run the aggregate query
//! - [`render_all`]: Format rows as literal blocks

use rusqlite::{Connection, OpenFlags, params};
use std::path::{Path, PathBuf};

pub const DAYS: usize = 7;
pub const SLOTS_PER_DAY: usize = 8;
pub const SCORE_COLUMNS: usize = DAYS * SLOTS_PER_DAY;

#[derive(Debug, thiserror::Error)]
pub enum ScoresError {
    #[error("ranking database not found: {path}")]
    MissingDatabase { path: PathBuf },
    #[error("sqlite error: {source}")]
    Sqlite { source: rusqlite::Error },
}

impl From<rusqlite::Error> for ScoresError {
    fn from(source: rusqlite::Error) -> Self {
        Self::Sqlite { source }
    }
}

/// Printed for rows whose activity column is NULL.
pub const NULL_ACTIVITY: &str = "None";

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ActivityScores {
    pub activity: Option<String>,
    /// Summed scores in `s00..s07, s10..s17, ..., s60..s67` order.
    pub scores: Vec<Option<f64>>,
}

fn score_columns() -> impl Iterator<Item = String> {
    (0..DAYS).flat_map(|day| (0..SLOTS_PER_DAY).map(move |slot| format!("s{day}{slot}")))
}

/// `CREATE TABLE` statement matching the ranking service's schema.
pub fn week_scores_schema() -> String {
    let scores = score_columns()
        .map(|column| format!("{column} double default 0"))
        .collect::<Vec<_>>()
        .join(", ");
    let flags = (0..DAYS)
        .map(|day| format!("f{day} int default 0"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE TABLE IF NOT EXISTS WeekScores (\
         activity text, year int, week int, {scores}, {flags}, \
         location text default NULL, \
         PRIMARY KEY(activity, year, week, location))"
    )
}

pub fn init_schema(conn: &Connection) -> Result<(), ScoresError> {
    conn.execute_batch(&week_scores_schema())?;
    Ok(())
}

pub fn week_scores_query() -> String {
    let sums = score_columns()
        .map(|column| format!("SUM({column})"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT activity, {sums} FROM WeekScores \
         WHERE (?1 IS NULL OR location = ?1) \
         GROUP BY activity"
    )
}

/// Open an existing ranking database without creating it.
pub fn open_ranking_db(path: &Path) -> Result<Connection, ScoresError> {
    if !path.is_file() {
        return Err(ScoresError::MissingDatabase {
            path: path.to_path_buf(),
        });
    }
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(conn)
}

/// Per-activity sums, optionally restricted to one location.
pub fn load_week_scores(
    conn: &Connection,
    location: Option<&str>,
) -> Result<Vec<ActivityScores>, ScoresError> {
    let sql = week_scores_query();
    tracing::debug!(?location, "querying week scores");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![location], |row| {
        let mut scores = Vec::with_capacity(SCORE_COLUMNS);
        for idx in 1..=SCORE_COLUMNS {
            scores.push(row.get::<_, Option<f64>>(idx)?);
        }
        Ok(ActivityScores {
            activity: row.get(0)?,
            scores,
        })
    })?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Significant digits a score is printed with.
const SCORE_DIGITS: i32 = 12;

/// Format one score the way a numeric REPL literal expects it.
///
/// Values are rounded to 12 significant digits (`%.12g`), switching to
/// exponent notation outside `1e-4..1e12`. Whole numbers keep a trailing
/// `.0`; a missing sum prints as `0`.
pub fn format_score(score: Option<f64>) -> String {
    let Some(value) = score else {
        return "0".to_string();
    };
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "inf" } else { "-inf" };
        return text.to_string();
    }

    let precision = (SCORE_DIGITS - 1) as usize;
    let scientific = format!("{value:.precision$e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let mut out = if exponent < -4 || exponent >= SCORE_DIGITS {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (SCORE_DIGITS - 1 - exponent) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    };

    if !out.contains(['.', 'e']) {
        out.push_str(".0");
    }
    out
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

pub fn render_block(index: usize, row: &ActivityScores) -> String {
    let activity = row.activity.as_deref().unwrap_or(NULL_ACTIVITY);
    let mut out = format!("% {activity}\nY {index} = [");
    for score in &row.scores {
        out.push(' ');
        out.push_str(&format_score(*score));
        out.push_str(" ,");
    }
    out.push_str("  0 ];\n");
    out
}

/// Blocks for all rows, numbered from zero in query order.
pub fn render_all(rows: &[ActivityScores]) -> String {
    rows.iter()
        .enumerate()
        .map(|(index, row)| render_block(index, row))
        .collect()
}
