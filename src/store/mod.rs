//! SQLite access shared by the rates store and the results store
//!
//! Each operation opens its own connection.

pub mod schema;

use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How long a writer waits on a locked database before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQL function trimming and lowercasing text with full Unicode case mapping
///
/// SQLite's built-in `lower()` and `NOCASE` only fold ASCII.
pub const FOLD_CASE_FUNCTION: &str = "fold_case";

/// Case-fold a make or model the same way `fold_case` does in SQL
pub fn fold_case(value: &str) -> String {
    value.trim().to_lowercase()
}

fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        FOLD_CASE_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|v| fold_case(&v)))
        },
    )
}

/// Handle to a SQLite database file
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a read-write connection, creating the file if needed
    pub fn connect(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        register_functions(&conn)?;
        Ok(conn)
    }

    /// Open a read-only connection; fails if the file does not exist
    pub fn connect_read_only(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX | OpenFlags::SQLITE_OPEN_URI,
        )?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        register_functions(&conn)?;
        Ok(conn)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::temp_database;

    #[test]
    fn test_read_only_requires_existing_file() {
        let db = temp_database("missing");
        assert!(db.connect_read_only().is_err());

        db.connect().unwrap().execute_batch("CREATE TABLE t (x INTEGER)").unwrap();
        assert!(db.connect_read_only().is_ok());
    }

    #[test]
    fn test_fold_case_handles_unicode() {
        assert_eq!(super::fold_case("  ŠKODA "), "škoda");

        let db = temp_database("fold-case");
        let conn = db.connect().unwrap();
        let folded: String = conn
            .query_row("SELECT fold_case('Škoda Octavia')", [], |row| row.get(0))
            .unwrap();
        assert_eq!(folded, "škoda octavia");

        let null: Option<String> = conn
            .query_row("SELECT fold_case(NULL)", [], |row| row.get(0))
            .unwrap();
        assert_eq!(null, None);
    }
}
