//! HTTPS listener.
//!
//! One task accepts TCP connections; each connection gets its own task that
//! performs the TLS handshake and serves HTTP/1.1 requests until the client
//! goes away. Failures are scoped to the connection and only logged.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use stencil_core::error::{Result, StencilError};
use tokio::net::{TcpListener, TcpStream};
use tokio_rustls::TlsAcceptor;
use tokio_rustls::rustls::ServerConfig;

use crate::handler::{ServerState, respond};

/// Pause after a failed `accept` so a persistent error (e.g. EMFILE) does not spin.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// A bound HTTPS listener ready to accept connections.
pub struct HttpsServer {
    listener: TcpListener,
    acceptor: TlsAcceptor,
    state: Arc<ServerState>,
}

impl HttpsServer {
    /// Binds the listener. Fails if the address is unavailable.
    pub async fn bind(addr: SocketAddr, tls_config: ServerConfig, state: ServerState) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| StencilError::config(format!("Failed to bind {}: {}", addr, e)))?;

        Ok(Self {
            listener,
            acceptor: TlsAcceptor::from(Arc::new(tls_config)),
            state: Arc::new(state),
        })
    }

    /// The address actually bound (useful when port 0 was requested).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections forever.
    pub async fn serve(self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let acceptor = self.acceptor.clone();
                    let state = Arc::clone(&self.state);
                    tokio::spawn(handle_connection(stream, peer, acceptor, state));
                }
                Err(e) => {
                    tracing::warn!("Accept error: {}", e);
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            }
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    acceptor: TlsAcceptor,
    state: Arc<ServerState>,
) {
    // Perform TLS handshake
    let tls_stream = match acceptor.accept(stream).await {
        Ok(s) => s,
        Err(e) => {
            tracing::debug!(%peer, "TLS handshake failed: {}", e);
            return;
        }
    };

    let io = TokioIo::new(tls_stream);
    let service = service_fn(move |req: hyper::Request<Incoming>| {
        let state = Arc::clone(&state);
        async move {
            let path = req.uri().path().to_string();
            Ok::<_, Infallible>(respond(&state, &path).await)
        }
    });

    if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
        tracing::debug!(%peer, "HTTPS connection error: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use stencil_infrastructure::{ResultsDirectory, TlsCredentials};
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio_rustls::TlsConnector;
    use tokio_rustls::rustls::crypto::ring;
    use tokio_rustls::rustls::pki_types::pem::PemObject;
    use tokio_rustls::rustls::pki_types::{CertificateDer, ServerName};
    use tokio_rustls::rustls::{ClientConfig, RootCertStore};

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../stencil-infrastructure/tests/fixtures")
            .join(name)
    }

    // Client that trusts only the self-signed fixture certificate
    fn connector() -> TlsConnector {
        let mut roots = RootCertStore::empty();
        roots
            .add(CertificateDer::from_pem_file(fixture("cert.pem")).unwrap())
            .unwrap();
        let config = ClientConfig::builder_with_provider(Arc::new(ring::default_provider()))
            .with_safe_default_protocol_versions()
            .unwrap()
            .with_root_certificates(roots)
            .with_no_client_auth();
        TlsConnector::from(Arc::new(config))
    }

    async fn start(temp_dir: &TempDir) -> SocketAddr {
        let results = ResultsDirectory::open_or_create(temp_dir.path().join("results")).unwrap();
        fs::write(results.path().join("page.html"), "<p>hi</p>").unwrap();

        let tls_config = TlsCredentials::new(fixture("cert.pem"), fixture("key.pem"))
            .load()
            .unwrap();
        let state = ServerState::new(results, "https://localhost:3000");
        let server = HttpsServer::bind("127.0.0.1:0".parse().unwrap(), tls_config, state)
            .await
            .unwrap();
        let addr = server.local_addr().unwrap();
        tokio::spawn(server.serve());
        addr
    }

    // Sends one request over TLS and returns the raw response text
    async fn get(addr: SocketAddr, path: &str) -> String {
        let tcp = TcpStream::connect(addr).await.unwrap();
        let domain = ServerName::try_from("localhost").unwrap();
        let mut tls = connector().connect(domain, tcp).await.unwrap();

        let request = format!(
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            path
        );
        tls.write_all(request.as_bytes()).await.unwrap();

        let mut raw = Vec::new();
        // A peer closing without close_notify still leaves the bytes read so far
        let _ = tls.read_to_end(&mut raw).await;
        String::from_utf8(raw).unwrap()
    }

    #[tokio::test]
    async fn test_index_is_served_over_tls() {
        let temp_dir = TempDir::new().unwrap();
        let addr = start(&temp_dir).await;

        let response = get(addr, "/").await;
        assert!(response.starts_with("HTTP/1.1 200 OK"), "{}", response);
        assert!(response.to_ascii_lowercase().contains("content-type: text/html"));
        assert!(response.contains(r#"href="https://localhost:3000/page.html""#));
    }

    #[tokio::test]
    async fn test_file_and_missing_file_over_tls() {
        let temp_dir = TempDir::new().unwrap();
        let addr = start(&temp_dir).await;

        let found = get(addr, "/page.html").await;
        assert!(found.starts_with("HTTP/1.1 200 OK"), "{}", found);
        assert!(found.ends_with("<p>hi</p>"));

        let missing = get(addr, "/missing.html").await;
        assert!(missing.starts_with("HTTP/1.1 404 Not Found"), "{}", missing);
        assert!(
            missing
                .to_ascii_lowercase()
                .contains("content-type: text/plain; charset=utf-8")
        );
        assert!(missing.ends_with("File not found"));
    }

    #[tokio::test]
    async fn test_plaintext_client_does_not_stop_the_server() {
        let temp_dir = TempDir::new().unwrap();
        let addr = start(&temp_dir).await;

        // A plain-text client fails the handshake; the listener keeps going
        let mut plain = TcpStream::connect(addr).await.unwrap();
        plain.write_all(b"GET / HTTP/1.1\r\n\r\n").await.unwrap();
        let mut sink = Vec::new();
        let _ = plain.read_to_end(&mut sink).await;

        let response = get(addr, "/").await;
        assert!(response.starts_with("HTTP/1.1 200 OK"), "{}", response);
    }
}
