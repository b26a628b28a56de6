use anyhow::{Context, Result};
use rusqlite::{params, types::Type, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use super::traits::{Collection, DocumentStore, Snapshot};

const DB_SCHEMA_VERSION: i64 = 1;

#[derive(Clone)]
pub struct SqliteStore {
    pub path: String,
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn db_get(conn: &Connection, collection: Collection, id: &str) -> rusqlite::Result<Option<Value>> {
    conn.query_row(
        &format!("SELECT data FROM {} WHERE id = ?1", collection.as_str()),
        params![id],
        |row| {
            let raw: String = row.get(0)?;
            serde_json::from_str(&raw)
                .map_err(|err| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(err)))
        },
    )
    .optional()
}

fn db_insert(conn: &Connection, collection: Collection, id: &str, data: &str) -> rusqlite::Result<()> {
    let now = now_secs();
    conn.execute(
        &format!(
            "INSERT INTO {} (id, data, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            collection.as_str()
        ),
        params![id, data, now],
    )?;
    Ok(())
}

fn db_update(conn: &Connection, collection: Collection, id: &str, data: &str) -> rusqlite::Result<usize> {
    conn.execute(
        &format!(
            "UPDATE {} SET data = json_patch(data, ?2), updated_at = ?3 WHERE id = ?1",
            collection.as_str()
        ),
        params![id, data, now_secs()],
    )
}

fn db_delete(conn: &Connection, collection: Collection, id: &str) -> rusqlite::Result<usize> {
    conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1", collection.as_str()),
        params![id],
    )
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_string_lossy().to_string(),
        }
    }

    pub fn reset_all(&self) -> Result<()> {
        if !std::path::Path::new(&self.path).exists() {
            return Ok(());
        }
        std::fs::remove_file(&self.path)?;
        Ok(())
    }

    pub fn init(&self) -> Result<()> {
        self.with_conn(|_conn| Ok(()))?;
        Ok(())
    }

    fn with_conn<F, T>(&self, f: F) -> rusqlite::Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = Connection::open(&self.path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(std::time::Duration::from_millis(500))?;

        Self::migrate(&conn)?;
        f(&conn)
    }

    fn migrate(conn: &Connection) -> rusqlite::Result<()> {
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if version == DB_SCHEMA_VERSION {
            return Ok(());
        }

        if version == 0 {
            log::info!(
                "SQLite schema migration: {} -> {}",
                version,
                DB_SCHEMA_VERSION
            );
            for collection in Collection::ALL {
                conn.execute_batch(&format!(
                    r#"
                CREATE TABLE {name} (
                    id TEXT PRIMARY KEY,
                    data TEXT NOT NULL CHECK (json_valid(data)),
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                );
                "#,
                    name = collection.as_str()
                ))?;
            }
            conn.pragma_update(None, "user_version", DB_SCHEMA_VERSION)?;
            return Ok(());
        }

        Err(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::ErrorCode::SchemaChanged as i32),
            Some("database schema version mismatch; please run with --reset option".to_string()),
        ))
    }
}

impl DocumentStore for SqliteStore {
    fn get(&self, collection: Collection, id: &str) -> Result<Snapshot> {
        let data = self
            .with_conn(|conn| db_get(conn, collection, id))
            .with_context(|| format!("loading {collection}/{id}"))?;
        Ok(match data {
            Some(data) => Snapshot::found(id, data),
            None => Snapshot::missing(id),
        })
    }

    fn insert(&self, collection: Collection, id: &str, data: &Value) -> Result<()> {
        let raw = serde_json::to_string(data)?;
        self.with_conn(|conn| db_insert(conn, collection, id, &raw))
            .with_context(|| format!("inserting {collection}/{id}"))?;
        Ok(())
    }

    fn update(&self, collection: Collection, id: &str, data: &Value) -> Result<bool> {
        if !data.is_object() {
            anyhow::bail!("update of {collection}/{id} must be a JSON object");
        }
        let raw = serde_json::to_string(data)?;
        let changed = self
            .with_conn(|conn| db_update(conn, collection, id, &raw))
            .with_context(|| format!("updating {collection}/{id}"))?;
        Ok(changed > 0)
    }

    fn delete(&self, collection: Collection, id: &str) -> Result<bool> {
        let removed = self
            .with_conn(|conn| db_delete(conn, collection, id))
            .with_context(|| format!("deleting {collection}/{id}"))?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_file(prefix: &str, ext: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        p.push(format!("{}_{}.{}", prefix, nanos, ext));
        p
    }

    fn fresh_store(prefix: &str) -> SqliteStore {
        let store = SqliteStore::new(unique_temp_file(prefix, "db"));
        store.init().unwrap();
        store
    }

    #[test]
    fn sqlite_reset_all_ok_when_missing() {
        let path = unique_temp_file("profiles_reset", "db");
        let store = SqliteStore::new(&path);
        store.reset_all().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn sqlite_reset_all_removes_existing_file() {
        let path = unique_temp_file("profiles_reset", "db");
        std::fs::write(&path, b"dummy").unwrap();
        let store = SqliteStore::new(&path);
        store.reset_all().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn sqlite_init_creates_one_table_per_collection() {
        let path = unique_temp_file("profiles_init", "db");
        SqliteStore::new(&path).init().unwrap();

        let conn = Connection::open(&path).unwrap();
        for collection in Collection::ALL {
            let name = conn
                .query_row(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    params![collection.as_str()],
                    |row| row.get::<_, String>(0),
                )
                .optional()
                .unwrap();
            assert_eq!(name.as_deref(), Some(collection.as_str()));
        }

        let version: i64 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, DB_SCHEMA_VERSION);
    }

    #[test]
    fn sqlite_fails_on_mismatched_schema_version() {
        let path = unique_temp_file("profiles_bad_version", "db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("PRAGMA user_version = 999;").unwrap();

        let err = SqliteStore::new(&path)
            .init()
            .expect_err("init should fail on version mismatch");
        let msg = format!("{err}");
        assert!(msg.contains("database schema version mismatch"));
        assert!(msg.contains("--reset"));
    }

    #[test]
    fn get_missing_document_is_not_an_error() {
        let store = fresh_store("profiles_missing");
        let snapshot = store.get(Collection::Individuals, "nobody").unwrap();
        assert!(!snapshot.exists());
        assert_eq!(snapshot.id, "nobody");
    }

    #[test]
    fn insert_then_get_returns_data() {
        let store = fresh_store("profiles_insert");
        let doc = json!({ "id": "u1", "zip": "92037" });
        store.insert(Collection::Organizations, "u1", &doc).unwrap();

        let snapshot = store.get(Collection::Organizations, "u1").unwrap();
        assert!(snapshot.exists());
        assert_eq!(snapshot.into_data(), Some(doc));
        assert!(!store.get(Collection::Individuals, "u1").unwrap().exists());
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let store = fresh_store("profiles_dup");
        store
            .insert(Collection::Individuals, "u1", &json!({ "zip": "92037" }))
            .unwrap();
        let err = store
            .insert(Collection::Individuals, "u1", &json!({ "zip": "92122" }))
            .unwrap_err();
        assert!(format!("{err:#}").contains("inserting individuals/u1"));
    }

    #[test]
    fn update_merges_top_level_keys() {
        let store = fresh_store("profiles_update");
        store
            .insert(
                Collection::Individuals,
                "u1",
                &json!({ "id": "u1", "email": "a@b.c", "zip": "92037", "skills": ["Cooking"] }),
            )
            .unwrap();

        let updated = store
            .update(
                Collection::Individuals,
                "u1",
                &json!({ "zip": "92122", "skills": [] }),
            )
            .unwrap();
        assert!(updated);

        let data = store
            .get(Collection::Individuals, "u1")
            .unwrap()
            .into_data()
            .unwrap();
        assert_eq!(
            data,
            json!({ "id": "u1", "email": "a@b.c", "zip": "92122", "skills": [] })
        );
    }

    #[test]
    fn update_and_delete_report_missing_documents() {
        let store = fresh_store("profiles_noop");
        assert!(!store
            .update(Collection::Individuals, "ghost", &json!({ "zip": "92037" }))
            .unwrap());
        assert!(!store.delete(Collection::Individuals, "ghost").unwrap());
    }

    #[test]
    fn delete_removes_document() {
        let store = fresh_store("profiles_delete");
        store
            .insert(Collection::Organizations, "org", &json!({ "zip": "92037" }))
            .unwrap();
        assert!(store.delete(Collection::Organizations, "org").unwrap());
        assert!(!store.get(Collection::Organizations, "org").unwrap().exists());
    }
}
