//! The same server behind both transports.

use crate::common::*;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use paymcp_mcp::{McpError, McpServer, create_router, stdio};
use serde_json::{Value, json};
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines,
    ReadBuf, ReadHalf, WriteHalf,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

const LIST: &str = r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;

#[tokio::test]
async fn test_http_and_stdio_agree() {
    let server = single_tenant(Arc::new(RecordingClient::new("k")), false);

    let http = create_router(server.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/mcp")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(LIST))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(http.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(http.into_body(), usize::MAX)
        .await
        .unwrap();
    let over_http: Value = serde_json::from_slice(&bytes).unwrap();

    let (mut client, server_end) = tokio::io::duplex(64 * 1024);
    let (read_half, write_half) = tokio::io::split(server_end);
    let handle = tokio::spawn(async move {
        stdio::serve(&server, read_half, write_half, CancellationToken::new()).await
    });
    client.write_all(format!("{LIST}\n").as_bytes()).await.unwrap();
    client.shutdown().await.unwrap();
    let mut output = String::new();
    client.read_to_string(&mut output).await.unwrap();
    handle.await.unwrap().unwrap();
    let over_stdio: Value = serde_json::from_str(output.trim()).unwrap();

    assert_eq!(over_http, over_stdio);
}

#[tokio::test]
async fn test_http_bearer_reaches_tool() {
    let router = create_router(multi_tenant());
    let body = json!({
        "jsonrpc": "2.0",
        "id": "w",
        "method": "tools/call",
        "params": {"name": "whoami", "arguments": {}}
    });

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header(header::AUTHORIZATION, bearer("rzp_live_tenant", "s3cret"))
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(result_text(&json), "rzp_live_tenant");
}

/// A stdio session on an in-memory pipe that stays open until the test
/// closes it.
struct StdioSession {
    input: WriteHalf<DuplexStream>,
    output: Lines<BufReader<ReadHalf<DuplexStream>>>,
    cancel: CancellationToken,
    handle: JoinHandle<Result<(), McpError>>,
}

impl StdioSession {
    fn start(server: McpServer) -> Self {
        let (client, server_end) = tokio::io::duplex(64 * 1024);
        let (server_read, server_write) = tokio::io::split(server_end);
        let (client_read, input) = tokio::io::split(client);
        let cancel = CancellationToken::new();

        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            stdio::serve(&server, server_read, server_write, token).await
        });

        Self {
            input,
            output: BufReader::new(client_read).lines(),
            cancel,
            handle,
        }
    }

    async fn send(&mut self, line: &[u8]) {
        self.input.write_all(line).await.unwrap();
        self.input.write_all(b"\n").await.unwrap();
    }

    async fn receive(&mut self) -> Value {
        let line = self.output.next_line().await.unwrap().unwrap();
        serde_json::from_str(&line).unwrap()
    }

    async fn cancel_and_join(self) -> Result<(), McpError> {
        self.cancel.cancel();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("stdio loop did not stop after cancellation")
            .unwrap()
    }
}

#[tokio::test]
async fn test_stdio_survives_invalid_utf8() {
    let server = single_tenant(Arc::new(RecordingClient::new("k")), false);
    let mut session = StdioSession::start(server);

    session
        .send(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"\xff\"}")
        .await;
    let parse_error = session.receive().await;
    assert_eq!(parse_error["error"]["code"], -32700);

    session.send(br#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#).await;
    let pong = session.receive().await;
    assert_eq!(pong["id"], 2);
    assert_eq!(pong["result"], json!({}));

    assert!(session.cancel_and_join().await.is_ok());
}

#[tokio::test]
async fn test_stdio_cancel_while_waiting_for_input() {
    let client = Arc::new(RecordingClient::new("rzp_test_stdio"));
    let mut session = StdioSession::start(single_tenant(client.clone(), false));

    session
        .send(
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "tools/call",
                "params": {"name": "fetch_thing", "arguments": {"thing_id": "t_1"}}
            })
            .to_string()
            .as_bytes(),
        )
        .await;
    let response = session.receive().await;
    assert!(!is_tool_error(&response));
    assert_eq!(client.calls().len(), 1);

    assert!(session.cancel_and_join().await.is_ok());
}

#[tokio::test]
async fn test_stdio_cancel_with_call_in_flight() {
    let server = single_tenant(Arc::new(RecordingClient::new("k")), false);
    let mut session = StdioSession::start(server);

    session
        .send(
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "tools/call",
                "params": {"name": "whoami", "arguments": {"delay_ms": 60_000}}
            })
            .to_string()
            .as_bytes(),
        )
        .await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(session.cancel_and_join().await.is_ok());
}

/// Reader whose every read fails.
struct BrokenInput;

impl AsyncRead for BrokenInput {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "input went away",
        )))
    }
}

#[tokio::test]
async fn test_stdio_read_failure_is_terminal_error() {
    let server = single_tenant(Arc::new(RecordingClient::new("k")), false);

    let cancel = CancellationToken::new();
    let result = stdio::serve(&server, BrokenInput, tokio::io::sink(), cancel).await;

    match result {
        Err(McpError::IoError(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("expected an IO error, got {other:?}"),
    }
}
