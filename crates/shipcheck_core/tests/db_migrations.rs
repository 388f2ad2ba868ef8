use rusqlite::Connection;
use shipcheck_core::db::migrations::{latest_version, schema_version};
use shipcheck_core::db::{open_db, open_db_in_memory, DbError};
use shipcheck_core::{KvStore, SqliteKvStore};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "kv_entries");
}

#[test]
fn values_survive_reopening_the_same_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shipcheck.db");

    {
        let conn = open_db(&path).unwrap();
        SqliteKvStore::new(&conn)
            .set("customChecklists", "[]")
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    let value = SqliteKvStore::new(&conn).get("customChecklists").unwrap();
    assert_eq!(value.as_deref(), Some("[]"));
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn kv_store_overwrites_removes_and_scans_by_prefix() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);

    kv.set("quickNote_builtin_A_s0_r0", "first").unwrap();
    kv.set("quickNote_builtin_A_s0_r0", "second").unwrap();
    kv.set("quickNote_builtin_A_s1_r2", "third").unwrap();
    kv.set("quickNote_builtin_B_s0_r0", "other").unwrap();

    assert_eq!(
        kv.get("quickNote_builtin_A_s0_r0").unwrap().as_deref(),
        Some("second")
    );
    assert_eq!(
        kv.keys_with_prefix("quickNote_builtin_A_s").unwrap(),
        vec![
            "quickNote_builtin_A_s0_r0".to_string(),
            "quickNote_builtin_A_s1_r2".to_string(),
        ]
    );

    kv.remove("quickNote_builtin_A_s0_r0").unwrap();
    kv.remove("never_written").unwrap();
    assert_eq!(kv.get("quickNote_builtin_A_s0_r0").unwrap(), None);
}

#[test]
fn prefix_scan_treats_like_wildcards_literally() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);

    kv.set("notes_builtin_A%", "x").unwrap();
    kv.set("notes_builtin_AB", "y").unwrap();

    assert_eq!(
        kv.keys_with_prefix("notes_builtin_A%").unwrap(),
        vec!["notes_builtin_A%".to_string()]
    );
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
