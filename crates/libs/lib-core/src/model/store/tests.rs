//! # Database Context Tests

use super::*;
use tempfile::TempDir;

fn db_path(dir: &TempDir) -> PathBuf {
    dir.path().join("data").join("finance.db")
}

#[tokio::test]
async fn test_get_before_initialize_fails() {
    let db = Database::new();

    let err = db.get().unwrap_err();

    assert!(matches!(err, AppError::DatabaseUninitialized));
    assert!(err.to_string().contains("not initialized"));
    assert!(!db.is_initialized());
    assert!(db.path().is_none());
}

#[tokio::test]
async fn test_initialize_creates_file_and_directory() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);

    let db = Database::open(&path).await.unwrap();

    assert!(path.exists());
    assert!(db.is_initialized());
    assert_eq!(db.path(), Some(path));
    assert!(db.health_check().await);
}

#[tokio::test]
async fn test_pragmas_applied() {
    let dir = TempDir::new().unwrap();
    let db = Database::open(db_path(&dir)).await.unwrap();
    let pool = db.get().unwrap();

    let journal_mode: String = sqlx::query_scalar("PRAGMA journal_mode")
        .fetch_one(&pool)
        .await
        .unwrap();
    let foreign_keys: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
        .fetch_one(&pool)
        .await
        .unwrap();
    let synchronous: i64 = sqlx::query_scalar("PRAGMA synchronous")
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_eq!(journal_mode.to_lowercase(), "wal");
    assert_eq!(foreign_keys, 1);
    // NORMAL
    assert_eq!(synchronous, 1);
}

#[tokio::test]
async fn test_foreign_keys_enforced() {
    let dir = TempDir::new().unwrap();
    let db = Database::open(db_path(&dir)).await.unwrap();
    let pool = db.get().unwrap();

    sqlx::query("CREATE TABLE categories (id INTEGER PRIMARY KEY)")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "CREATE TABLE expenses (id INTEGER PRIMARY KEY, category_id INTEGER NOT NULL REFERENCES categories(id))",
    )
    .execute(&pool)
    .await
    .unwrap();

    let result = sqlx::query("INSERT INTO expenses (category_id) VALUES (42)")
        .execute(&pool)
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_invalid_path_fails_and_health_check_reports_false() {
    let dir = TempDir::new().unwrap();
    let not_a_dir = dir.path().join("plain-file");
    std::fs::write(&not_a_dir, b"not a directory").unwrap();

    let db = Database::new();
    let result = db.initialize(not_a_dir.join("finance.db")).await;

    assert!(result.is_err());
    assert!(!db.is_initialized());
    assert!(!db.health_check().await);
}

#[tokio::test]
async fn test_health_check_false_when_uninitialized() {
    assert!(!Database::new().health_check().await);
}

#[tokio::test]
async fn test_health_check_false_after_file_deleted() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let db = Database::open(&path).await.unwrap();
    assert!(db.health_check().await);

    std::fs::remove_file(&path).unwrap();

    assert!(!db.health_check().await);
}

#[tokio::test]
async fn test_health_check_false_when_read_only() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let db = Database::open(&path).await.unwrap();

    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_readonly(true);
    std::fs::set_permissions(&path, perms).unwrap();

    assert!(!db.health_check().await);
}

#[tokio::test]
async fn test_health_check_false_after_file_corrupted() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let db = Database::open(&path).await.unwrap();
    assert!(db.health_check().await);

    std::fs::write(&path, vec![0xAB; 8192]).unwrap();

    assert!(!db.health_check().await);
    assert!(db.is_initialized());
}

#[tokio::test]
async fn test_check_file_writable_reports_cause() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plain.db");

    let missing = check_file_writable(&path).await.unwrap_err();
    assert!(missing.contains("unreachable"));

    std::fs::write(&path, b"").unwrap();
    assert!(check_file_writable(&path).await.is_ok());

    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_readonly(true);
    std::fs::set_permissions(&path, perms).unwrap();

    let read_only = check_file_writable(&path).await.unwrap_err();
    assert!(read_only.contains("read-only"));
}

#[tokio::test]
async fn test_close_then_reinitialize() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let db = Database::open(&path).await.unwrap();
    let first = db.get().unwrap();

    db.close().await;

    assert!(first.is_closed());
    assert!(matches!(db.get(), Err(AppError::DatabaseUninitialized)));
    assert!(!db.health_check().await);

    db.initialize(&path).await.unwrap();
    let pool = db.get().unwrap();
    let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await.unwrap();

    assert_eq!(one, 1);
    assert!(db.health_check().await);
}

#[tokio::test]
async fn test_close_uninitialized_is_noop() {
    let db = Database::new();
    db.close().await;
    assert!(!db.is_initialized());
}

#[tokio::test]
async fn test_initialize_twice_leaves_one_open_pool() {
    let dir = TempDir::new().unwrap();
    let first_path = dir.path().join("first.db");
    let second_path = dir.path().join("second.db");

    let db = Database::open(&first_path).await.unwrap();
    let first = db.get().unwrap();

    let second = db.initialize(&second_path).await.unwrap();

    assert!(first.is_closed());
    assert!(!second.is_closed());
    assert_eq!(db.path(), Some(second_path));
    assert!(db.health_check().await);
}

#[tokio::test]
async fn test_clones_share_state() {
    let dir = TempDir::new().unwrap();
    let db = Database::new();
    let handle = db.clone();

    db.initialize(db_path(&dir)).await.unwrap();
    assert!(handle.health_check().await);

    handle.close().await;
    assert!(!db.is_initialized());
}
