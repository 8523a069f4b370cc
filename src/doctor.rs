//! Health check for the configured inputs.
//!
//! The doctor command checks:
//! - Ranking database exists and `WeekScores` is queryable
//! - Compilation database, when configured, loads and has entries
//!
//! # Key Functions
//!
//! - [`run_doctor`]: Generate a diagnostic report

use crate::compdb::{COMPDB_FILE_NAME, CompilationDatabase};
use crate::scores::{load_week_scores, open_ranking_db};
use std::path::{Path, PathBuf};

#[derive(Debug, serde::Serialize)]
pub struct DoctorReport {
    pub db_path: PathBuf,
    pub db_exists: bool,
    pub schema_ok: bool,
    pub schema_error: Option<String>,
    pub activity_count: usize,
    pub compdb_path: Option<PathBuf>,
    pub compdb_ok: bool,
    pub compdb_error: Option<String>,
    pub compdb_entries: usize,
}

pub fn run_doctor(db_path: &Path, compdb_dir: Option<&Path>) -> DoctorReport {
    let db_exists = db_path.is_file();

    let mut schema_ok = false;
    let mut schema_error = None;
    let mut activity_count = 0;

    if db_exists {
        match open_ranking_db(db_path).and_then(|conn| load_week_scores(&conn, None)) {
            Ok(rows) => {
                schema_ok = true;
                activity_count = rows.len();
            }
            Err(err) => schema_error = Some(err.to_string()),
        }
    }

    let mut compdb_ok = false;
    let mut compdb_error = None;
    let mut compdb_entries = 0;

    if let Some(dir) = compdb_dir {
        match CompilationDatabase::open(dir) {
            Ok(database) => {
                compdb_ok = true;
                compdb_entries = database.len();
            }
            Err(err) => compdb_error = Some(err.to_string()),
        }
    }

    DoctorReport {
        db_path: db_path.to_path_buf(),
        db_exists,
        schema_ok,
        schema_error,
        activity_count,
        compdb_path: compdb_dir.map(|dir| dir.join(COMPDB_FILE_NAME)),
        compdb_ok,
        compdb_error,
        compdb_entries,
    }
}
