//! The parts of the Pi-hole gravity schema phdb depends on.
//!
//! phdb never creates or migrates a real Pi-hole database. It only checks
//! that the tables it reads and writes are present. [`PIHOLE_SCHEMA_SQL`]
//! exists so tests and local experiments can build a compatible database.

use rusqlite::{Connection, Result};

/// Tables every gravity database must have.
pub const REQUIRED_TABLES: [&str; 3] = ["adlist", "domainlist", "gravity"];

/// Subset of the Pi-hole v5 gravity schema.
///
/// `UNIQUE(address)` and `UNIQUE(domain, type)` are what make
/// `INSERT OR IGNORE` idempotent, exactly as in the real database. The group
/// link tables, their triggers and `gravity.adlist_id` carry the same
/// foreign keys Pi-hole declares.
pub const PIHOLE_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS "group" (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    enabled BOOLEAN NOT NULL DEFAULT 1,
    name TEXT UNIQUE NOT NULL,
    date_added INTEGER NOT NULL DEFAULT (cast(strftime('%s', 'now') as int)),
    date_modified INTEGER NOT NULL DEFAULT (cast(strftime('%s', 'now') as int)),
    description TEXT
);
INSERT OR IGNORE INTO "group" (id, enabled, name, description)
    VALUES (0, 1, 'Default', 'The default group');

CREATE TABLE IF NOT EXISTS adlist (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    address TEXT UNIQUE NOT NULL,
    enabled BOOLEAN NOT NULL DEFAULT 1,
    date_added INTEGER NOT NULL DEFAULT (cast(strftime('%s', 'now') as int)),
    date_modified INTEGER NOT NULL DEFAULT (cast(strftime('%s', 'now') as int)),
    comment TEXT
);

CREATE TABLE IF NOT EXISTS adlist_by_group (
    adlist_id INTEGER NOT NULL REFERENCES adlist (id),
    group_id INTEGER NOT NULL REFERENCES "group" (id),
    PRIMARY KEY (adlist_id, group_id)
);

CREATE TABLE IF NOT EXISTS domainlist (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    type INTEGER NOT NULL DEFAULT 0,
    domain TEXT NOT NULL,
    enabled BOOLEAN NOT NULL DEFAULT 1,
    date_added INTEGER NOT NULL DEFAULT (cast(strftime('%s', 'now') as int)),
    date_modified INTEGER NOT NULL DEFAULT (cast(strftime('%s', 'now') as int)),
    comment TEXT,
    UNIQUE(domain, type)
);

CREATE TABLE IF NOT EXISTS domainlist_by_group (
    domainlist_id INTEGER NOT NULL REFERENCES domainlist (id),
    group_id INTEGER NOT NULL REFERENCES "group" (id),
    PRIMARY KEY (domainlist_id, group_id)
);

CREATE TABLE IF NOT EXISTS gravity (
    domain TEXT NOT NULL,
    adlist_id INTEGER NOT NULL REFERENCES adlist (id)
);

CREATE TRIGGER IF NOT EXISTS tr_adlist_add AFTER INSERT ON adlist
    BEGIN
        INSERT INTO adlist_by_group (adlist_id, group_id) VALUES (NEW.id, 0);
    END;

CREATE TRIGGER IF NOT EXISTS tr_adlist_delete AFTER DELETE ON adlist
    BEGIN
        DELETE FROM adlist_by_group WHERE adlist_id = OLD.id;
    END;

CREATE TRIGGER IF NOT EXISTS tr_domainlist_add AFTER INSERT ON domainlist
    BEGIN
        INSERT INTO domainlist_by_group (domainlist_id, group_id) VALUES (NEW.id, 0);
    END;

CREATE TRIGGER IF NOT EXISTS tr_domainlist_delete AFTER DELETE ON domainlist
    BEGIN
        DELETE FROM domainlist_by_group WHERE domainlist_id = OLD.id;
    END;
"#;

/// Create the minimal schema on a fresh connection.
///
/// # Errors
///
/// Returns an error if the SQL fails.
pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(PIHOLE_SCHEMA_SQL)
}

/// Return the first required table that is missing, if any.
///
/// This is also the first statement run on a freshly opened connection, so
/// a corrupt or non-SQLite file fails here.
///
/// # Errors
///
/// Returns an error if `sqlite_master` cannot be queried.
pub fn missing_table(conn: &Connection) -> Result<Option<&'static str>> {
    let mut stmt =
        conn.prepare("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1")?;

    for table in REQUIRED_TABLES {
        let count: i64 = stmt.query_row([table], |row| row.get(0))?;
        if count == 0 {
            return Ok(Some(table));
        }
    }

    Ok(None)
}
