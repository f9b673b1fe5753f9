//! Tests for loading decision tables from disk and over HTTP.

use std::path::Path;
use std::time::Duration;
use tabletoe::{
    Board, GameSession, LoadErrorKind, MarkMapping, Model, TableLoader, TableSource, encode, router,
};

const NORMAL_TABLE: &str = r#"{
    "(0, 0, 0, 0, 0, 0, 0, 0, 0)": [0.1, 0.0, 0.2, 0.0, 0.9, 0.0, 0.2, 0.0, 0.1],
    "(0, 1, -1, 0, 0, 0, 0, 0, 0)": [0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0],
    "(0, 0, 0)": [1.0, 2.0, 3.0],
    "(0, 0, 0, 0, 0, 0, 0, 0, 1)": [1.0, 2.0]
}"#;

fn write_table(dir: &Path, model: Model, body: &str) {
    std::fs::write(dir.join(model.file_name()), body).unwrap();
}

/// Serves `dir` under `/tables` on an ephemeral loopback port.
async fn serve_tables(dir: &Path) -> String {
    let loader = TableLoader::new(TableSource::Directory(dir.to_path_buf()));
    let session = GameSession::new(loader, Duration::from_millis(10), Model::Normal);
    let app = router(session, Some(dir.to_path_buf()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/tables", addr)
}

#[tokio::test]
async fn test_loads_from_directory_and_drops_bad_entries() {
    let dir = tempfile::tempdir().unwrap();
    write_table(dir.path(), Model::Normal, NORMAL_TABLE);

    let loader = TableLoader::new(TableSource::Directory(dir.path().to_path_buf()));
    let table = loader.load(Model::Normal).await.unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.rejected(), 2);

    let key = encode(&Board::parse(".OX......").unwrap(), MarkMapping::canonical());
    assert_eq!(key.as_str(), "(0, 1, -1, 0, 0, 0, 0, 0, 0)");
    assert_eq!(table.lookup(&key).map(|v| v[3]), Some(0.5));
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let loader = TableLoader::new(TableSource::Directory(dir.path().to_path_buf()));

    let err = loader.load(Model::Easy).await.unwrap_err();
    assert_eq!(err.kind, LoadErrorKind::Io);
    assert!(err.notice().contains("Playing randomly"));
}

#[tokio::test]
async fn test_malformed_json_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    write_table(dir.path(), Model::Advanced, "{ not json");

    let loader = TableLoader::new(TableSource::Directory(dir.path().to_path_buf()));
    let err = loader.load(Model::Advanced).await.unwrap_err();
    assert_eq!(err.kind, LoadErrorKind::Parse);
}

#[tokio::test]
async fn test_loads_over_http() {
    let dir = tempfile::tempdir().unwrap();
    write_table(dir.path(), Model::Normal, NORMAL_TABLE);
    let base = serve_tables(dir.path()).await;

    let loader = TableLoader::new(TableSource::parse(&base));
    let table = loader.load(Model::Normal).await.unwrap();
    assert_eq!(table.len(), 2);
}

#[tokio::test]
async fn test_http_not_found_is_status_error() {
    let dir = tempfile::tempdir().unwrap();
    let base = serve_tables(dir.path()).await;

    let loader = TableLoader::new(TableSource::parse(&base));
    let err = loader.load(Model::Easy).await.unwrap_err();
    assert_eq!(err.kind, LoadErrorKind::Status);
}

#[tokio::test]
async fn test_unreachable_host_is_http_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let loader = TableLoader::new(TableSource::parse(&format!("http://{}", addr)));
    let err = loader.load(Model::Normal).await.unwrap_err();
    assert_eq!(err.kind, LoadErrorKind::Http);
}
