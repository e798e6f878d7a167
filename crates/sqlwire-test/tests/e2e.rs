//! End-to-end tests: real server, real client, real TCP.
//!
//! Each test gets its own database file and its own port, so tests run in
//! parallel without stepping on each other.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use sqlwire_client::{Client, ClientConfig};
use sqlwire_server::database::{Database, DatabaseConfig};
use sqlwire_server::net::Server;
use sqlwire_test::next_port;

/// Starts a server on a fresh database and returns its address.
///
/// The returned `TempDir` keeps the database file alive for the test's
/// duration; the server task dies with the runtime.
async fn start_server(config: DatabaseConfig) -> (TempDir, SocketAddr) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let db = Database::open(dir.path().join("e2e.sqlite3"), config).expect("failed to open db");

    let addr: SocketAddr = format!("127.0.0.1:{}", next_port()).parse().unwrap();
    let server = Server::new(Arc::new(db), addr);
    tokio::spawn(async move {
        let _ = server.serve().await;
    });

    // Give the listener a moment to bind.
    tokio::time::sleep(Duration::from_millis(100)).await;

    (dir, addr)
}

async fn connect(addr: SocketAddr) -> Client {
    let config = ClientConfig::new()
        .host(addr.ip().to_string())
        .port(addr.port())
        .connect_timeout(Duration::from_secs(5));
    Client::connect(config).await.expect("failed to connect")
}

#[tokio::test]
async fn test_query_round_trip() {
    let (_dir, addr) = start_server(DatabaseConfig::default()).await;
    let mut client = connect(addr).await;

    let result = client
        .execute("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);")
        .await
        .unwrap();
    assert!(!result.is_error(), "unexpected error: {}", result.error);

    client
        .execute("INSERT INTO users (name) VALUES ('Alice'), ('Bob');")
        .await
        .unwrap();

    let result = client
        .execute("SELECT id, name FROM users ORDER BY id;")
        .await
        .unwrap();
    assert_eq!(result.columns, vec!["id", "name"]);
    assert_eq!(
        result.rows,
        vec![
            vec!["1".to_string(), "Alice".to_string()],
            vec!["2".to_string(), "Bob".to_string()],
        ]
    );
}

#[tokio::test]
async fn test_null_values_over_the_wire() {
    let (_dir, addr) = start_server(DatabaseConfig::default()).await;
    let mut client = connect(addr).await;

    client
        .execute("CREATE TABLE t (a TEXT, b INTEGER);")
        .await
        .unwrap();
    client.execute("INSERT INTO t VALUES (NULL, 3);").await.unwrap();

    let result = client.execute("SELECT a, b FROM t;").await.unwrap();
    assert_eq!(result.rows, vec![vec!["NULL".to_string(), "3".to_string()]]);
}

#[tokio::test]
async fn test_error_keeps_connection_usable() {
    let (_dir, addr) = start_server(DatabaseConfig::default()).await;
    let mut client = connect(addr).await;

    let result = client.execute("SELECT * FROM missing;").await.unwrap();
    assert!(result.is_error());
    assert!(result.error.contains("missing"));
    assert!(result.columns.is_empty());
    assert!(result.rows.is_empty());

    // The same connection serves the next query.
    let result = client.execute("SELECT 1 AS one;").await.unwrap();
    assert!(!result.is_error());
    assert_eq!(result.rows, vec![vec!["1".to_string()]]);
}

#[tokio::test]
async fn test_deadline_exceeded_keeps_connection_usable() {
    let (_dir, addr) = start_server(DatabaseConfig {
        query_timeout: Duration::from_millis(100),
        ..DatabaseConfig::default()
    })
    .await;
    let mut client = connect(addr).await;

    let slow = "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c WHERE x < 500000000) SELECT count(*) FROM c;";
    let result = client.execute(slow).await.unwrap();
    assert!(result.is_error());
    assert!(result.error.contains("deadline"));

    let result = client.execute("SELECT 2 AS two;").await.unwrap();
    assert!(!result.is_error());
    assert_eq!(result.rows, vec![vec!["2".to_string()]]);
}

#[tokio::test]
async fn test_concurrent_connections_get_their_own_results() {
    let (_dir, addr) = start_server(DatabaseConfig::default()).await;

    let mut setup = connect(addr).await;
    setup
        .execute("CREATE TABLE marks (conn INTEGER, val INTEGER);")
        .await
        .unwrap();
    setup
        .execute("INSERT INTO marks VALUES (1, 100), (2, 200);")
        .await
        .unwrap();
    drop(setup);

    let task = |conn_id: i64, expected: &'static str| async move {
        let mut client = connect(addr).await;
        for _ in 0..20 {
            let result = client
                .execute(&format!("SELECT val FROM marks WHERE conn = {conn_id};"))
                .await
                .unwrap();
            assert!(!result.is_error(), "unexpected error: {}", result.error);
            assert_eq!(result.rows, vec![vec![expected.to_string()]]);
        }
    };

    // Interleaved sessions must only ever see their own results.
    tokio::join!(task(1, "100"), task(2, "200"));
}

#[tokio::test]
async fn test_many_round_trips_on_one_session() {
    let (_dir, addr) = start_server(DatabaseConfig::default()).await;
    let mut client = connect(addr).await;

    client.execute("CREATE TABLE n (v INTEGER);").await.unwrap();
    for i in 0..10 {
        client
            .execute(&format!("INSERT INTO n VALUES ({i});"))
            .await
            .unwrap();
    }

    let result = client.execute("SELECT count(*) FROM n;").await.unwrap();
    assert_eq!(result.rows, vec![vec!["10".to_string()]]);
}

#[tokio::test]
async fn test_disconnect_leaves_server_serving_others() {
    let (_dir, addr) = start_server(DatabaseConfig::default()).await;

    let first = connect(addr).await;
    drop(first);

    // A dropped peer only ends its own handling routine.
    let mut second = connect(addr).await;
    let result = second.execute("SELECT 'still here' AS msg;").await.unwrap();
    assert_eq!(result.rows, vec![vec!["still here".to_string()]]);
}
