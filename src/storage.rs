// Storage layer: owns the SQLite movies table. A connection is opened and
// dropped per operation (single local user, no pooling needed); the schema
// is created idempotently on every open.
//
// Expected business conditions (duplicate, not found) never surface as
// errors here: mutating operations return structured outcomes the UI can
// render directly.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::warn;
use rusqlite::{params, Connection};
use thiserror::Error;

use crate::api::{LookupError, MovieData, OmdbClient};

const DEFAULT_DB_PATH: &str = "data/movies.db";

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS movies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT UNIQUE NOT NULL,
    year INTEGER NOT NULL,
    rating REAL NOT NULL,
    poster TEXT NOT NULL
)";

/// Persistence failure: the database file could not be opened or a statement
/// failed. Business conditions are not errors and never use this type.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("could not create database directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Per-title movie details as returned by [`Storage::get_movies`].
#[derive(Debug, Clone, PartialEq)]
pub struct MovieInfo {
    pub year: i32,
    pub rating: f64,
    pub poster: String,
}

/// Outcome of an add operation. Exactly one row is inserted for `Added`;
/// every other variant leaves storage unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added {
        title: String,
        year: i32,
        rating: f64,
    },
    NotFound {
        title: String,
    },
    Duplicate {
        title: String,
    },
    ApiConnection,
    DatabaseError {
        detail: String,
    },
}

/// Handle to the movies database. Holds only the path; each operation opens
/// its own scoped connection.
pub struct Storage {
    db_path: PathBuf,
}

impl Storage {
    /// Database path from `MOVIEDB_PATH`, defaulting to `data/movies.db`
    /// relative to the working directory.
    pub fn from_env() -> Self {
        let path = std::env::var("MOVIEDB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
        Self::new(path)
    }

    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Open a connection and ensure the schema exists.
    fn connect(&self) -> Result<Connection, StorageError> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let conn = Connection::open(&self.db_path)?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(conn)
    }

    /// Read-only snapshot of the whole collection, keyed by title. Iteration
    /// order is alphabetical, which fixes tie-break behavior downstream.
    pub fn get_movies(&self) -> Result<BTreeMap<String, MovieInfo>, StorageError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT title, year, rating, poster FROM movies")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                MovieInfo {
                    year: row.get(1)?,
                    rating: row.get(2)?,
                    poster: row.get(3)?,
                },
            ))
        })?;

        let mut movies = BTreeMap::new();
        for row in rows {
            let (title, info) = row?;
            movies.insert(title, info);
        }
        Ok(movies)
    }

    /// Look up `title` in the remote catalog and insert the resolved record.
    /// All failure modes fold into the outcome value; this never panics and
    /// never propagates an error.
    pub fn add_movie(&self, client: &OmdbClient, title: &str) -> AddOutcome {
        self.resolve_lookup(title, client.lookup(title))
    }

    /// Fold a lookup result into an outcome: found records go through the
    /// duplicate-check-and-insert path, connection and unexpected-payload
    /// failures both render as a connection problem.
    fn resolve_lookup(
        &self,
        requested: &str,
        lookup: Result<MovieData, LookupError>,
    ) -> AddOutcome {
        match lookup {
            Ok(data) => self.store_fetched(data),
            Err(LookupError::NotFound { title }) => AddOutcome::NotFound { title },
            Err(err @ LookupError::Connection(_)) | Err(err @ LookupError::Api(_)) => {
                warn!("catalog lookup for {requested:?} failed: {err}");
                AddOutcome::ApiConnection
            }
        }
    }

    /// Duplicate-check and insert a catalog-resolved record. The check uses
    /// the canonical title from the catalog, not the user's raw input.
    pub fn store_fetched(&self, data: MovieData) -> AddOutcome {
        let conn = match self.connect() {
            Ok(conn) => conn,
            Err(e) => {
                return AddOutcome::DatabaseError {
                    detail: e.to_string(),
                }
            }
        };

        match contains_title(&conn, &data.title) {
            Ok(true) => return AddOutcome::Duplicate { title: data.title },
            Ok(false) => {}
            Err(e) => {
                return AddOutcome::DatabaseError {
                    detail: e.to_string(),
                }
            }
        }

        let inserted = conn.execute(
            "INSERT INTO movies (title, year, rating, poster) VALUES (?1, ?2, ?3, ?4)",
            params![data.title, data.year, data.rating, data.poster],
        );
        match inserted {
            Ok(_) => AddOutcome::Added {
                title: data.title,
                year: data.year,
                rating: data.rating,
            },
            Err(e) => {
                warn!("insert for {:?} failed: {e}", data.title);
                AddOutcome::DatabaseError {
                    detail: e.to_string(),
                }
            }
        }
    }

    /// Low-level insert without the duplicate check. Used to seed fixtures.
    pub fn insert_movie(&self, data: &MovieData) -> Result<(), StorageError> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO movies (title, year, rating, poster) VALUES (?1, ?2, ?3, ?4)",
            params![data.title, data.year, data.rating, data.poster],
        )?;
        Ok(())
    }

    /// Remove a movie by title. `Ok(false)` when no such row exists; nothing
    /// else changes in that case.
    pub fn delete_movie(&self, title: &str) -> Result<bool, StorageError> {
        let conn = self.connect()?;
        let deleted = conn.execute("DELETE FROM movies WHERE title = ?1", params![title])?;
        Ok(deleted > 0)
    }

    /// Overwrite the rating of an existing movie. The numeric range is not
    /// validated. `Ok(false)` when the title is absent.
    pub fn update_movie(&self, title: &str, rating: f64) -> Result<bool, StorageError> {
        let conn = self.connect()?;
        let updated = conn.execute(
            "UPDATE movies SET rating = ?1 WHERE title = ?2",
            params![rating, title],
        )?;
        Ok(updated > 0)
    }
}

fn contains_title(conn: &Connection, title: &str) -> Result<bool, rusqlite::Error> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM movies WHERE title = ?1)",
        params![title],
        |row| row.get(0),
    )
}
