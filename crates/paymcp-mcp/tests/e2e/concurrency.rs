//! Per-request client isolation under concurrent HTTP load.

use crate::common::*;
use axum::body::Body;
use axum::http::{Request, header};
use futures::future::join_all;
use paymcp_mcp::create_router;
use serde_json::{Value, json};
use tower::ServiceExt;

const CALLERS: usize = 32;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_each_request_sees_its_own_client() {
    let router = create_router(multi_tenant());

    let calls = (0..CALLERS).map(|i| {
        let router = router.clone();
        tokio::spawn(async move {
            let key_id = format!("rzp_test_{i:02}");
            let body = json!({
                "jsonrpc": "2.0",
                "id": i,
                "method": "tools/call",
                "params": {
                    "name": "whoami",
                    "arguments": {"delay_ms": (CALLERS - i) as u64}
                }
            });
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/mcp")
                        .header(header::AUTHORIZATION, bearer(&key_id, "secret"))
                        .body(Body::from(body.to_string()))
                        .unwrap(),
                )
                .await
                .unwrap();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let json: Value = serde_json::from_slice(&bytes).unwrap();
            (i, key_id, json)
        })
    });

    for joined in join_all(calls).await {
        let (i, key_id, json) = joined.unwrap();
        assert_eq!(json["id"], i);
        assert!(!is_tool_error(&json), "caller {i}: {json}");
        assert_eq!(result_text(&json), key_id);
    }
}
