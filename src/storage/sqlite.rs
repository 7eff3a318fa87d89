//! SQLite access to the Pi-hole gravity database.
//!
//! Reads run directly on the connection. Writes go through
//! [`GravityStore::transaction`], which hands a [`ListWriter`] to a closure
//! and commits once when the closure succeeds. Any error drops the
//! transaction, which rolls it back.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, OpenFlags, Params, Transaction, TransactionBehavior, params};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{Category, Snapshot, Source};
use crate::storage::schema::{create_schema, missing_table};

/// How long to wait on a lock held by pihole-FTL before giving up.
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle on an open gravity database.
///
/// The connection is closed when the store is dropped, on every exit path.
#[derive(Debug)]
pub struct GravityStore {
    conn: Connection,
    path: PathBuf,
}

impl GravityStore {
    /// Open an existing database for reading and writing.
    ///
    /// The file is never created.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseUnavailable` if the file cannot be opened or is not a
    /// SQLite database, and `NotGravityDatabase` if a required table is
    /// missing.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    }

    /// Open an existing database read-only.
    ///
    /// # Errors
    ///
    /// Same as [`GravityStore::open`].
    pub fn open_read_only(path: &Path) -> Result<Self> {
        Self::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    }

    fn open_with_flags(path: &Path, flags: OpenFlags) -> Result<Self> {
        let unavailable = |source| Error::DatabaseUnavailable {
            path: path.to_path_buf(),
            source,
        };

        let conn = Connection::open_with_flags(path, flags).map_err(unavailable)?;
        configure(&conn).map_err(unavailable)?;

        if let Some(table) = missing_table(&conn).map_err(unavailable)? {
            return Err(Error::NotGravityDatabase {
                path: path.to_path_buf(),
                table: table.to_string(),
            });
        }

        info!(db = %path.display(), "connection established");
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Open an in-memory database with the minimal Pi-hole schema (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        configure(&conn)?;
        create_schema(&conn)?;
        Ok(Self {
            conn,
            path: PathBuf::from(":memory:"),
        })
    }

    /// Get a reference to the underlying connection (for read operations).
    #[must_use]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fetch the distinct entries of one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn fetch(&self, category: Category) -> Result<BTreeSet<String>> {
        debug!(%category, "fetching");

        let entries = match category.source() {
            Source::Adlist => self.collect_column("SELECT address FROM adlist", [])?,
            Source::Domainlist(kind) => self.collect_column(
                "SELECT domain FROM domainlist WHERE type = ?1",
                [kind.code()],
            )?,
            Source::Gravity => self.collect_column("SELECT DISTINCT domain FROM gravity", [])?,
        };

        Ok(entries)
    }

    fn collect_column<P: Params>(&self, sql: &str, params: P) -> Result<BTreeSet<String>> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let values = stmt
            .query_map(params, |row| row.get(0))?
            .collect::<rusqlite::Result<BTreeSet<String>>>()?;
        Ok(values)
    }

    /// Fetch several categories into a fresh [`Snapshot`].
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub fn fetch_snapshot(&self, categories: &[Category]) -> Result<Snapshot> {
        let mut snapshot = Snapshot::new();
        for &category in categories {
            let entries = self.fetch(category)?;
            info!(%category, count = entries.len(), "fetched");
            snapshot.insert(category, entries);
        }
        Ok(snapshot)
    }

    /// Run `f` inside a single IMMEDIATE transaction.
    ///
    /// Commits once after `f` returns `Ok`. If `f` fails the transaction is
    /// rolled back and nothing it wrote is kept.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or an error if begin/commit fails.
    pub fn transaction<F, R>(&mut self, f: F) -> Result<R>
    where
        F: FnOnce(&ListWriter<'_>) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let result = f(&ListWriter { tx: &tx })?;

        tx.commit()?;
        debug!("transaction committed");

        Ok(result)
    }

    /// Close the connection, reporting any error SQLite raises on close.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite refuses to close the handle.
    pub fn close(self) -> Result<()> {
        info!(db = %self.path.display(), "closing connection");
        self.conn.close().map_err(|(_, e)| Error::Database(e))
    }
}

/// Write operations available inside [`GravityStore::transaction`].
pub struct ListWriter<'a> {
    tx: &'a Transaction<'a>,
}

impl ListWriter<'_> {
    /// Insert each value, ignoring ones that already exist.
    ///
    /// Returns the number of rows actually inserted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for gravity, or an error if a statement fails.
    pub fn insert(&self, category: Category, values: &BTreeSet<String>) -> Result<usize> {
        let mut inserted = 0;

        match category.source() {
            Source::Adlist => {
                let mut stmt = self
                    .tx
                    .prepare_cached("INSERT OR IGNORE INTO adlist (address) VALUES (?1)")?;
                for value in values {
                    inserted += stmt.execute([value])?;
                }
            }
            Source::Domainlist(kind) => {
                let mut stmt = self.tx.prepare_cached(
                    "INSERT OR IGNORE INTO domainlist (type, domain, enabled) VALUES (?1, ?2, 1)",
                )?;
                for value in values {
                    inserted += stmt.execute(params![kind.code(), value])?;
                }
            }
            Source::Gravity => return Err(read_only(category)),
        }

        Ok(inserted)
    }

    /// Delete each value from the category.
    ///
    /// Returns the number of rows deleted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for gravity, or an error if a statement fails.
    pub fn delete(&self, category: Category, values: &BTreeSet<String>) -> Result<usize> {
        let mut deleted = 0;

        match category.source() {
            Source::Adlist => {
                let mut stmt = self
                    .tx
                    .prepare_cached("DELETE FROM adlist WHERE address = ?1")?;
                for value in values {
                    deleted += stmt.execute([value])?;
                }
            }
            Source::Domainlist(kind) => {
                let mut stmt = self
                    .tx
                    .prepare_cached("DELETE FROM domainlist WHERE type = ?1 AND domain = ?2")?;
                for value in values {
                    deleted += stmt.execute(params![kind.code(), value])?;
                }
            }
            Source::Gravity => return Err(read_only(category)),
        }

        Ok(deleted)
    }

    /// Insert `to_insert`, then delete `to_delete`.
    ///
    /// Returns `(inserted, deleted)` row counts.
    ///
    /// # Errors
    ///
    /// Returns an error if either step fails.
    pub fn apply(
        &self,
        category: Category,
        to_insert: &BTreeSet<String>,
        to_delete: &BTreeSet<String>,
    ) -> Result<(usize, usize)> {
        let inserted = self.insert(category, to_insert)?;
        let deleted = self.delete(category, to_delete)?;
        debug!(%category, inserted, deleted, "applied");
        Ok((inserted, deleted))
    }

    /// Remove every entry of the category.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the category does not support it.
    pub fn delete_all(&self, category: Category) -> Result<usize> {
        match category.source() {
            Source::Domainlist(kind) => {
                let deleted = self
                    .tx
                    .execute("DELETE FROM domainlist WHERE type = ?1", [kind.code()])?;
                Ok(deleted)
            }
            Source::Adlist | Source::Gravity => Err(Error::InvalidArgument(format!(
                "{category} does not support clearing every entry"
            ))),
        }
    }
}

/// Per-connection settings applied before any query runs.
///
/// Foreign key enforcement (on by default in the bundled SQLite) is off:
/// `gravity` rows keep pointing at a removed adlist until the next
/// `pihole -g` rebuilds the table.
fn configure(conn: &Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    conn.pragma_update(None, "foreign_keys", false)
}

fn read_only(category: Category) -> Error {
    Error::InvalidArgument(format!("{category} is export-only"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn seeded() -> GravityStore {
        let store = GravityStore::open_memory().unwrap();
        store
            .conn()
            .execute_batch(
                "INSERT INTO adlist (address) VALUES ('https://example.com/hosts');
                 INSERT INTO adlist (address) VALUES ('https://lists.example.org/ads.txt');
                 INSERT INTO domainlist (type, domain) VALUES (0, 'allowed.com');
                 INSERT INTO domainlist (type, domain) VALUES (1, 'denied.com');
                 INSERT INTO domainlist (type, domain) VALUES (1, 'also-denied.com');
                 INSERT INTO domainlist (type, domain) VALUES (2, '^allow');
                 INSERT INTO domainlist (type, domain) VALUES (3, '^deny');
                 INSERT INTO gravity (domain, adlist_id) VALUES ('ads.com', 1);
                 INSERT INTO gravity (domain, adlist_id) VALUES ('ads.com', 2);
                 INSERT INTO gravity (domain, adlist_id) VALUES ('tracker.com', 1);",
            )
            .unwrap();
        store
    }

    #[test]
    fn test_open_memory() {
        let store = GravityStore::open_memory();
        assert!(store.is_ok());
    }

    #[test]
    fn test_fetch_by_category() {
        let store = seeded();

        assert_eq!(
            store.fetch(Category::Adlists).unwrap(),
            set(&["https://example.com/hosts", "https://lists.example.org/ads.txt"])
        );
        assert_eq!(store.fetch(Category::Whitelist).unwrap(), set(&["allowed.com"]));
        assert_eq!(
            store.fetch(Category::Blacklist).unwrap(),
            set(&["also-denied.com", "denied.com"])
        );
        assert_eq!(store.fetch(Category::WhitelistRegex).unwrap(), set(&["^allow"]));
        assert_eq!(store.fetch(Category::BlacklistRegex).unwrap(), set(&["^deny"]));
        assert_eq!(
            store.fetch(Category::Gravity).unwrap(),
            set(&["ads.com", "tracker.com"])
        );
    }

    #[test]
    fn test_fetch_snapshot() {
        let store = seeded();
        let snapshot = store.fetch_snapshot(&Category::UPLOADABLE).unwrap();

        assert!(!snapshot.contains(Category::Gravity));
        assert_eq!(snapshot.count(Category::Blacklist), 2);
    }

    #[test]
    fn test_insert_is_idempotent_and_scoped_by_type() {
        let mut store = seeded();

        let inserted = store
            .transaction(|w| w.insert(Category::Blacklist, &set(&["denied.com", "new.com"])))
            .unwrap();
        assert_eq!(inserted, 1);

        // Same domain under a different type is a different row
        store
            .transaction(|w| w.insert(Category::Whitelist, &set(&["denied.com"])))
            .unwrap();
        assert_eq!(
            store.fetch(Category::Whitelist).unwrap(),
            set(&["allowed.com", "denied.com"])
        );
        assert_eq!(
            store.fetch(Category::Blacklist).unwrap(),
            set(&["also-denied.com", "denied.com", "new.com"])
        );
    }

    #[test]
    fn test_apply_inserts_and_deletes() {
        let mut store = seeded();

        // gravity still references adlist 1 until the next `pihole -g`
        let counts = store
            .transaction(|w| {
                w.apply(
                    Category::Adlists,
                    &set(&["https://other.org/list.txt"]),
                    &set(&["https://example.com/hosts"]),
                )
            })
            .unwrap();

        assert_eq!(counts, (1, 1));
        assert_eq!(
            store.fetch(Category::Adlists).unwrap(),
            set(&["https://lists.example.org/ads.txt", "https://other.org/list.txt"])
        );
        assert_eq!(
            store.fetch(Category::Gravity).unwrap(),
            set(&["ads.com", "tracker.com"])
        );
    }

    #[test]
    fn test_adlist_delete_keeps_group_links_consistent() {
        let mut store = seeded();

        store
            .transaction(|w| w.delete(Category::Adlists, &set(&["https://example.com/hosts"])))
            .unwrap();

        let links: i64 = store
            .conn()
            .query_row("SELECT COUNT(*) FROM adlist_by_group", [], |row| row.get(0))
            .unwrap();
        assert_eq!(links, 1);
    }

    #[test]
    fn test_file_database_allows_adlist_removal() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("gravity.db");
        {
            let conn = Connection::open(&path).unwrap();
            create_schema(&conn).unwrap();
            conn.execute_batch(
                "INSERT INTO adlist (address) VALUES ('https://a.example/hosts');
                 INSERT INTO adlist (address) VALUES ('https://b.example/hosts');
                 INSERT INTO gravity (domain, adlist_id) VALUES ('ads.com', 2);",
            )
            .unwrap();
        }

        let mut store = GravityStore::open(&path).unwrap();
        let deleted = store
            .transaction(|w| w.delete(Category::Adlists, &set(&["https://b.example/hosts"])))
            .unwrap();

        assert_eq!(deleted, 1);
        assert_eq!(
            store.fetch(Category::Adlists).unwrap(),
            set(&["https://a.example/hosts"])
        );
    }

    #[test]
    fn test_delete_all_only_touches_one_type() {
        let mut store = seeded();

        let deleted = store
            .transaction(|w| w.delete_all(Category::Blacklist))
            .unwrap();

        assert_eq!(deleted, 2);
        assert!(store.fetch(Category::Blacklist).unwrap().is_empty());
        assert_eq!(store.fetch(Category::Whitelist).unwrap().len(), 1);
        assert_eq!(store.fetch(Category::BlacklistRegex).unwrap().len(), 1);
    }

    #[test]
    fn test_writes_rejected_for_gravity_and_adlist_delete_all() {
        let mut store = seeded();

        let result = store.transaction(|w| w.insert(Category::Gravity, &set(&["x.com"])));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));

        let result = store.transaction(|w| w.delete_all(Category::Adlists));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert_eq!(store.fetch(Category::Adlists).unwrap().len(), 2);
    }

    #[test]
    fn test_failed_transaction_rolls_back() {
        let mut store = seeded();

        let result: Result<()> = store.transaction(|w| {
            w.insert(Category::Blacklist, &set(&["rolled-back.com"]))?;
            Err(Error::InvalidArgument("abort".to_string()))
        });

        assert!(result.is_err());
        assert!(
            !store
                .fetch(Category::Blacklist)
                .unwrap()
                .contains("rolled-back.com")
        );
    }

    #[test]
    fn test_open_rejects_non_database_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("gravity.db");
        std::fs::write(&path, "this is not sqlite, just some text padding it out").unwrap();

        let result = GravityStore::open(&path);
        assert!(matches!(result, Err(Error::DatabaseUnavailable { .. })));
    }

    #[test]
    fn test_open_rejects_foreign_schema() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("gravity.db");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE something_else (id INTEGER);")
            .unwrap();

        let result = GravityStore::open_read_only(&path);
        assert!(matches!(result, Err(Error::NotGravityDatabase { .. })));
    }

    #[test]
    fn test_open_missing_file_does_not_create_it() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("gravity.db");

        assert!(GravityStore::open(&path).is_err());
        assert!(!path.exists());
    }
}
