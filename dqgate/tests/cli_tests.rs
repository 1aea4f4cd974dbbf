use anyhow::Result;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A throwaway project: a DuckDB warehouse plus a dqgate.yaml.
struct GateTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl GateTestEnv {
    fn new(warehouse_sql: &str, config: &str) -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().join("sparkify");
        std::fs::create_dir_all(&root)?;

        // Connection dropped at the end of the block, releasing the file lock
        {
            let conn = duckdb::Connection::open(root.join("warehouse.duckdb"))?;
            conn.execute_batch(warehouse_sql)?;
        }
        std::fs::write(root.join("dqgate.yaml"), config)?;

        Ok(Self { _tmp: tmp, root })
    }

    fn dqgate(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dqgate"));
        cmd.current_dir(&self.root);
        cmd.env_remove("DQGATE_POLICY");
        cmd.env_remove("DQGATE_DATABASE");
        cmd.env_remove("DQGATE_TARGET_PATH");
        cmd
    }

    fn report_path(&self) -> PathBuf {
        self.root.join("target").join("run_report.json")
    }
}

const STAR_SCHEMA: &str = "
    CREATE TABLE songplays (songplay_id INTEGER, start_time TIMESTAMP, user_id INTEGER);
    CREATE TABLE users (user_id INTEGER, level VARCHAR);
    CREATE TABLE songs (song_id VARCHAR, title VARCHAR);
    CREATE TABLE artists (artist_id VARCHAR, name VARCHAR);
    CREATE TABLE time (start_time TIMESTAMP, hour INTEGER);
    INSERT INTO songplays VALUES (1, TIMESTAMP '2018-11-01 21:01:46', 8);
    INSERT INTO users VALUES (8, 'free'), (10, 'paid');
    INSERT INTO songs VALUES ('SOAOIBZ12AB01815BE', 'I Hold Your Hand In Mine');
    INSERT INTO artists VALUES ('ARPBNLO1187FB3D52F', 'Tiny Tim');
    INSERT INTO time VALUES (TIMESTAMP '2018-11-01 21:01:46', 21);
";

const DEFAULT_SUITE_CONFIG: &str = "
name: sparkify
database: warehouse.duckdb
default-suite: true
";

fn read_report(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

#[test]
fn test_default_suite_passes_on_loaded_warehouse() -> Result<()> {
    let env = GateTestEnv::new(STAR_SCHEMA, DEFAULT_SUITE_CONFIG)?;

    env.dqgate()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("SUCCESS"))
        .stdout(predicate::str::contains("column_no_nulls(artists.artist_id)"));

    let report = read_report(&env.report_path())?;
    assert!(report.contains("\"failures\": []"));
    assert!(report.contains("\"total\": 8"));
    Ok(())
}

#[test]
fn test_null_key_fails_the_gate() -> Result<()> {
    let sql = format!("{}\nINSERT INTO songs VALUES (NULL, 'Orphan');", STAR_SCHEMA);
    let env = GateTestEnv::new(&sql, DEFAULT_SUITE_CONFIG)?;

    env.dqgate()
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "column_no_nulls(songs.song_id): expected 0, actual 1",
        ));

    let report = read_report(&env.report_path())?;
    assert!(report.contains("\"policy\": \"fail_fast\""));
    Ok(())
}

#[test]
fn test_collect_all_reports_every_failure() -> Result<()> {
    let sql = format!("{}\nDELETE FROM users;", STAR_SCHEMA);
    let config = "
name: sparkify
database: warehouse.duckdb
default-suite: true
checks:
  - kind: custom
    query: SELECT 42
    expected: 7
";
    let env = GateTestEnv::new(&sql, config)?;

    env.dqgate()
        .args(["check", "--collect-all", "--no-report"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("2 check(s) failed"))
        .stderr(predicate::str::contains("table_not_empty(users): expected 0, actual 1"))
        .stderr(predicate::str::contains("custom(SELECT 42): expected 7, actual 42"));

    assert!(!env.report_path().exists());
    Ok(())
}

#[test]
fn test_engine_error_is_not_a_check_failure() -> Result<()> {
    let config = "
name: sparkify
database: warehouse.duckdb
checks:
  - kind: table_not_empty
    table: users
  - kind: table_not_empty
    table: staging_events
  - kind: table_not_empty
    table: songs
";
    let env = GateTestEnv::new(STAR_SCHEMA, config)?;

    env.dqgate()
        .arg("check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("EXECUTION ERROR"))
        .stderr(predicate::str::contains("check 2/3 'table_not_empty(staging_events)'"))
        .stderr(predicate::str::contains("1 of 3 checks completed"));

    // Partial progress is kept
    let report = read_report(&env.report_path())?;
    assert!(report.contains("table_not_empty(users)"));
    Ok(())
}

#[test]
fn test_list_shows_queries_without_running() -> Result<()> {
    // Empty warehouse: listing must not care
    let env = GateTestEnv::new("SELECT 1;", DEFAULT_SUITE_CONFIG)?;

    env.dqgate()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("8 checks for 'sparkify'"))
        .stdout(predicate::str::contains(
            "SELECT COUNT(*) FROM users WHERE user_id IS NULL",
        ));
    Ok(())
}

#[test]
fn test_query_prints_scalar() -> Result<()> {
    let env = GateTestEnv::new(STAR_SCHEMA, DEFAULT_SUITE_CONFIG)?;

    env.dqgate()
        .args(["query", "SELECT COUNT(*) FROM users"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2"));
    Ok(())
}

#[test]
fn test_missing_config_fails() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dqgate"));
    cmd.current_dir(tmp.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load quality gate configuration"));
    Ok(())
}
