use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio::time;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Start an actual TCP server with a fresh fan-out hub. Returns its address;
/// the server runs in the background.
pub async fn start_server() -> SocketAddr {
    let state = lab_api::AppState {
        config: Arc::new(lab_api::config::Config::from_env()),
        hub: Arc::new(lab_api::fanout::FanoutHub::new()),
    };
    let app = lab_api::routes::router().with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// Connect a WebSocket client and give the server a moment to finish the
/// attach, so an immediately-following event is guaranteed to see it.
pub async fn connect(addr: SocketAddr, path: &str) -> WsClient {
    let url = format!("ws://{addr}{path}");
    let (ws, _) = tokio_tungstenite::connect_async(&url)
        .await
        .expect("ws connect");
    time::sleep(Duration::from_millis(100)).await;
    ws
}

pub async fn recv_text(ws: &mut WsClient) -> String {
    let msg = time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("timeout waiting for frame")
        .expect("stream ended")
        .expect("ws read error");
    msg.into_text().expect("not text").to_string()
}

pub async fn recv_json(ws: &mut WsClient) -> serde_json::Value {
    serde_json::from_str(&recv_text(ws).await).expect("parse frame")
}

/// Assert that no frame arrives within a short window.
pub async fn assert_silent(ws: &mut WsClient) {
    let res = time::timeout(Duration::from_millis(200), ws.next()).await;
    assert!(res.is_err(), "expected no frame, got {res:?}");
}

/// POST a committed domain event to an event shim and return the delivery
/// receipt.
pub async fn post_event(
    addr: SocketAddr,
    path: &str,
    body: &serde_json::Value,
) -> serde_json::Value {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://{addr}{path}"))
        .json(body)
        .send()
        .await
        .expect("post event");
    assert!(
        resp.status().is_success(),
        "unexpected status {}",
        resp.status()
    );
    resp.json().await.expect("parse receipt")
}
