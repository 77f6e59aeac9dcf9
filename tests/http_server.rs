use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use thoughtbook::config::{AppState, Config};
use thoughtbook::server;
use thoughtbook::store::MemoryStore;

struct TestServer {
    addr: SocketAddr,
    shutdown: Arc<Notify>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    async fn start() -> Self {
        let mut config = Config::load_from("tests/no-such-config").unwrap();
        config.logging.access_log = false;
        config.http.enable_cors = true;
        config.performance.shutdown_grace_period = 2;

        let listener = server::bind_listener("127.0.0.1:0".parse().unwrap(), 64).unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(AppState::new(config, Arc::new(MemoryStore::new())));
        let shutdown = Arc::new(Notify::new());
        let handle = tokio::spawn(server::serve(listener, state, Arc::clone(&shutdown)));

        Self {
            addr,
            shutdown,
            handle,
        }
    }

    async fn stop(self) {
        self.shutdown.notify_one();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not stop in time")
            .unwrap()
            .unwrap();
    }
}

struct RawResponse {
    status: u16,
    head: String,
    body: Value,
}

async fn send(addr: SocketAddr, method: &str, path: &str, body: Option<&str>) -> RawResponse {
    let body = body.unwrap_or("");
    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
         Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();

    let text = String::from_utf8(raw).unwrap();
    let (head, body) = text.split_once("\r\n\r\n").unwrap();
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap();
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body).unwrap()
    };

    RawResponse {
        status,
        head: head.to_ascii_lowercase(),
        body,
    }
}

#[tokio::test]
async fn test_user_and_friend_flow_over_tcp() {
    let srv = TestServer::start().await;
    let addr = srv.addr;

    let alice = send(addr, "POST", "/users", Some(r#"{"username":"alice"}"#)).await;
    assert_eq!(alice.status, 200);
    assert!(alice.head.contains("server: thoughtbook"));
    assert!(alice.head.contains("access-control-allow-origin: *"));
    let alice_id = alice.body["_id"].as_str().unwrap().to_string();

    let bob = send(addr, "POST", "/users", Some(r#"{"username":"bob"}"#)).await;
    let bob_id = bob.body["_id"].as_str().unwrap().to_string();

    let added = send(addr, "POST", &format!("/users/{alice_id}/friends/{bob_id}"), None).await;
    assert_eq!(added.status, 200);
    assert_eq!(added.body["friends"], json!([bob_id]));

    let fetched = send(addr, "GET", &format!("/users/{alice_id}"), None).await;
    assert_eq!(fetched.status, 200);
    assert_eq!(fetched.body["username"], "alice");
    assert_eq!(fetched.body["friends"][0]["username"], "bob");

    let thought = send(
        addr,
        "POST",
        "/thoughts",
        Some(&format!(
            r#"{{"thoughtText":"hi","username":"alice","userId":"{alice_id}"}}"#
        )),
    )
    .await;
    assert_eq!(thought.status, 200);
    let thought_id = thought.body["_id"].as_str().unwrap().to_string();

    let deleted = send(addr, "DELETE", &format!("/users/{alice_id}"), None).await;
    assert_eq!(deleted.status, 200);

    let gone = send(addr, "GET", &format!("/thoughts/{thought_id}"), None).await;
    assert_eq!(gone.status, 404);

    let again = send(addr, "DELETE", &format!("/users/{alice_id}"), None).await;
    assert_eq!(again.status, 404);
    assert_eq!(again.body, json!({ "message": "No user found with this id!" }));

    srv.stop().await;
}

#[tokio::test]
async fn test_transport_errors_over_tcp() {
    let srv = TestServer::start().await;
    let addr = srv.addr;

    let unknown = send(addr, "GET", "/nope", None).await;
    assert_eq!(unknown.status, 404);
    assert_eq!(unknown.body, json!({ "message": "Route not found" }));

    let wrong = send(addr, "PATCH", "/thoughts", None).await;
    assert_eq!(wrong.status, 405);
    assert!(wrong.head.contains("allow: get, post, options"));

    let malformed = send(addr, "POST", "/users", Some("{not json")).await;
    assert_eq!(malformed.status, 400);

    let preflight = send(addr, "OPTIONS", "/users", None).await;
    assert_eq!(preflight.status, 204);
    assert!(preflight.head.contains("access-control-allow-methods: get, post, options"));

    let live = send(addr, "GET", "/healthz", None).await;
    assert_eq!(live.status, 200);
    assert_eq!(live.body, json!({ "status": "ok" }));

    srv.stop().await;
}
