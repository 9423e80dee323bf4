//! HttpProvider against a throwaway HTTP/1.1 server on localhost.
//!
//! Each test binds an ephemeral port, answers one request with a canned
//! status and body, and hands back the raw request it saw.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use chainweb3_core::{Web3Error, RpcTransport};
use chainweb3_http::{HttpProvider, HttpProviderConfig};

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

async fn read_request(sock: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = sock.read(&mut chunk).await.expect("read failed");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = header_end(&buf) {
            let head = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
            let len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .map(|v| v.trim().parse::<usize>().expect("bad content-length"))
                .unwrap_or(0);
            if buf.len() >= pos + 4 + len {
                break;
            }
        }
    }
    String::from_utf8(buf).expect("request not utf-8")
}

/// Serve one request with `status` and `body`; the handle yields the raw request.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let request = read_request(&mut sock).await;
        let reply = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        sock.write_all(reply.as_bytes()).await.unwrap();
        let _ = sock.shutdown().await;
        request
    });
    (format!("127.0.0.1:{port}"), handle)
}

fn body_of(request: &str) -> &str {
    request.split("\r\n\r\n").nth(1).unwrap_or_default()
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn posts_exact_envelope_and_parses_result() {
    let (host, server) =
        serve_once("200 OK", r#"{"jsonrpc":"2.0","id":1,"result":"0x0234c8a3397aab58"}"#).await;
    let provider = HttpProvider::connect(&host).unwrap();

    let result = provider
        .call(
            "eth_getBalance",
            vec![
                serde_json::json!("0x407d73d8a49eeb85d32cf465507dd71d507100c1"),
                serde_json::json!("latest"),
            ],
        )
        .await
        .unwrap();
    assert_eq!(result, serde_json::json!("0x0234c8a3397aab58"));

    let request = server.await.unwrap();
    assert!(request.starts_with("POST / HTTP/1.1"), "got {request}");
    assert!(request.to_lowercase().contains("content-type: application/json"));
    assert_eq!(
        body_of(&request),
        r#"{"jsonrpc":"2.0","method":"eth_getBalance","params":["0x407d73d8a49eeb85d32cf465507dd71d507100c1","latest"],"id":1}"#
    );
}

#[tokio::test]
async fn rpc_error_inside_non_2xx_is_still_rpc_error() {
    let (host, server) = serve_once(
        "500 Internal Server Error",
        r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32603,"message":"internal error"}}"#,
    )
    .await;
    let provider = HttpProvider::connect(&host).unwrap();
    match provider.call("eth_blockNumber", vec![]).await {
        Err(Web3Error::Rpc(e)) => {
            assert_eq!(e.code, -32603);
            assert_eq!(e.message, "internal error");
        }
        other => panic!("unexpected {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn non_2xx_without_envelope_is_transport_error() {
    let (host, server) = serve_once("502 Bad Gateway", "<html>bad gateway</html>").await;
    let provider = HttpProvider::connect(&host).unwrap();
    match provider.call("eth_blockNumber", vec![]).await {
        Err(Web3Error::Transport(msg)) => assert!(msg.contains("502"), "{msg}"),
        other => panic!("unexpected {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn garbage_body_is_malformed_response() {
    let (host, server) = serve_once("200 OK", r#"{"jsonrpc":"2.0","id":1}"#).await;
    let provider = HttpProvider::connect(&host).unwrap();
    match provider.call("eth_blockNumber", vec![]).await {
        Err(Web3Error::MalformedResponse { raw }) => assert_eq!(raw, r#"{"jsonrpc":"2.0","id":1}"#),
        other => panic!("unexpected {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn response_for_another_request_is_malformed() {
    let body = r#"{"jsonrpc":"2.0","id":7,"result":"0x1"}"#;
    let (host, server) = serve_once("200 OK", body).await;
    let provider = HttpProvider::connect(&host).unwrap();
    match provider.call("eth_blockNumber", vec![]).await {
        Err(Web3Error::MalformedResponse { raw }) => assert_eq!(raw, body),
        other => panic!("unexpected {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn parse_error_with_null_id_stays_rpc_error() {
    let (host, server) = serve_once(
        "200 OK",
        r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32700,"message":"parse error"}}"#,
    )
    .await;
    let provider = HttpProvider::connect(&host).unwrap();
    match provider.call("eth_blockNumber", vec![]).await {
        Err(Web3Error::Rpc(e)) => assert_eq!(e.code, -32700),
        other => panic!("unexpected {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn is_connected_reads_net_listening() {
    let (host, server) = serve_once("200 OK", r#"{"jsonrpc":"2.0","id":1,"result":true}"#).await;
    let provider = HttpProvider::connect(&host).unwrap();
    assert!(provider.is_connected().await);
    let request = server.await.unwrap();
    assert!(body_of(&request).contains(r#""method":"net_listening""#));
}

#[tokio::test]
async fn refused_connection_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let provider = HttpProvider::connect(&format!("127.0.0.1:{port}")).unwrap();
    assert!(matches!(
        provider.call("eth_blockNumber", vec![]).await,
        Err(Web3Error::Transport(_))
    ));
    assert!(!provider.is_connected().await);
}

#[tokio::test]
async fn slow_node_hits_request_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let _ = read_request(&mut sock).await;
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let provider = HttpProvider::new(
        &format!("127.0.0.1:{port}"),
        HttpProviderConfig {
            request_timeout: Duration::from_millis(200),
            ..Default::default()
        },
    )
    .unwrap();
    match provider.call("eth_blockNumber", vec![]).await {
        Err(Web3Error::Timeout { ms }) => assert_eq!(ms, 200),
        other => panic!("unexpected {other:?}"),
    }
    server.abort();
}
