use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};

const DB_DIR: &str = "mpg_scout";
const DB_FILE: &str = "players.sqlite";

/// Durable key→value table mapping player id to the mercato pick
/// rate last computed by the refresh job. Absent rows and NULL rates
/// both read as 0; there is no versioning and no expiry. The refresh
/// job is the single writer, ranking requests only read, and a
/// reader racing a refresh may see either the old or the new value.
pub struct PickRateStore {
    conn: Connection,
}

impl PickRateStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let conn = Connection::open(path)
            .with_context(|| format!("open pick rate db {}", path.display()))?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory pick rate db")?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Stored rate for one player; `None` means the id was never
    /// recorded, which callers treat as rate 0.
    pub fn get(&self, id: &str) -> Result<Option<f64>> {
        self.conn
            .query_row(
                "SELECT COALESCE(mercato_pr, 0) FROM players WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .context("query pick rate")
    }

    /// Batched lookup for a ranked set of ids: one `IN` query
    /// instead of a round trip per surviving row. Ids without a row
    /// are simply absent from the result map.
    pub fn get_many(&self, ids: &[String]) -> Result<HashMap<String, f64>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT id, COALESCE(mercato_pr, 0) FROM players WHERE id IN ({placeholders})"
        );
        let mut stmt = self.conn.prepare(&sql).context("prepare pick rate batch query")?;
        let mut rows = stmt
            .query(params_from_iter(ids.iter()))
            .context("query pick rate batch")?;

        let mut out = HashMap::with_capacity(ids.len());
        while let Some(row) = rows.next().context("read pick rate row")? {
            out.insert(row.get(0)?, row.get(1)?);
        }
        Ok(out)
    }

    /// Unconditional single-row upsert, last writer wins.
    pub fn put(&self, id: &str, rate: f64) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO players (id, mercato_pr) VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET mercato_pr = excluded.mercato_pr",
                params![id, rate],
            )
            .context("upsert pick rate")?;
        Ok(())
    }

    /// Write a refresh batch in one transaction. A failure rolls the
    /// whole batch back, so the store never ends up half-updated.
    pub fn put_all(&mut self, entries: &[(String, f64)]) -> Result<usize> {
        let tx = self.conn.transaction().context("begin pick rate batch")?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO players (id, mercato_pr) VALUES (?1, ?2)
                     ON CONFLICT(id) DO UPDATE SET mercato_pr = excluded.mercato_pr",
                )
                .context("prepare pick rate upsert")?;
            for (id, rate) in entries {
                stmt.execute(params![id, rate]).context("upsert pick rate")?;
            }
        }
        tx.commit().context("commit pick rate batch")?;
        Ok(entries.len())
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS players (
            id TEXT PRIMARY KEY,
            mercato_pr REAL
        );
        "#,
    )
    .context("create pick rate schema")?;
    Ok(())
}

pub fn default_db_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(DB_FILE))
}

fn app_cache_dir() -> Option<PathBuf> {
    // Prefer XDG cache.
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(DB_DIR));
        }
    }
    // Fallback to ~/.cache on linux-like systems.
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(DB_DIR))
}
