use std::path::{Path, PathBuf};

use roverdb::config::DatabaseConfig;
use roverdb::store::Database;
use tempfile::TempDir;

/// File-backed rover database in a temporary directory.
pub struct TempDb {
    dir: TempDir,
    path: PathBuf,
    db: Database,
}

impl TempDb {
    pub fn create() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("storage.db");
        let db = Database::open(&Self::config_for(&path)).expect("open temp database");
        Self { dir, path, db }
    }

    /// Connection settings pointing at `path`.
    pub fn config_for(path: &Path) -> DatabaseConfig {
        DatabaseConfig {
            path: path.display().to_string(),
            pool_size: 4,
            busy_timeout_ms: 5000,
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Open a second handle on the same file.
    pub fn reopen(&self) -> Database {
        Database::open(&Self::config_for(&self.path)).expect("reopen temp database")
    }
}
