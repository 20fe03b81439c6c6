//! Metadata-service doubles built on `wiremock`.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const DOC_PATH: &str = "/latest/dynamic/instance-identity/document";
pub const TOKEN_PATH: &str = "/latest/api/token";

/// `<server uri><DOC_PATH>`, suitable for `[metadata].endpoint`.
pub fn document_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), DOC_PATH)
}

/// Server answering the identity document with `status` and `body`.
pub async fn document_server(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOC_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

/// Server that accepts the document request but answers only after `delay`.
pub async fn stalled_server(delay: Duration) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOC_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"region":"too-late-1"}"#)
                .set_delay(delay),
        )
        .mount(&server)
        .await;
    server
}

/// A loopback address with nothing listening on it.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    addr
}
