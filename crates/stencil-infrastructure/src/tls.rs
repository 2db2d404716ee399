//! TLS credential loading.
//!
//! The key pair is read once at startup. Any failure here is fatal: the
//! server never runs without valid credentials.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use stencil_core::error::{Result, StencilError};
use tokio_rustls::rustls::ServerConfig;
use tokio_rustls::rustls::crypto::ring;
use tokio_rustls::rustls::pki_types::pem::PemObject;
use tokio_rustls::rustls::pki_types::{CertificateDer, PrivateKeyDer};

/// Locations of the PEM-encoded key pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsCredentials {
    /// Path to the certificate chain.
    pub cert_path: PathBuf,
    /// Path to the private key (PKCS#8, PKCS#1 or SEC1).
    pub key_path: PathBuf,
}

impl TlsCredentials {
    pub fn new(cert_path: impl Into<PathBuf>, key_path: impl Into<PathBuf>) -> Self {
        Self {
            cert_path: cert_path.into(),
            key_path: key_path.into(),
        }
    }

    /// Loads the key pair and builds a server configuration.
    pub fn load(&self) -> Result<ServerConfig> {
        let certs = load_certs(&self.cert_path)?;
        let key = load_key(&self.key_path)?;

        let config = ServerConfig::builder_with_provider(Arc::new(ring::default_provider()))
            .with_safe_default_protocol_versions()
            .map_err(|e| StencilError::tls(format!("Unsupported protocol versions: {}", e)))?
            .with_no_client_auth()
            .with_single_cert(certs, key)
            .map_err(|e| StencilError::tls(format!("Certificate and key do not match: {}", e)))?;

        tracing::info!(
            "Loaded TLS credentials (cert: {:?}, key: {:?})",
            self.cert_path,
            self.key_path
        );
        Ok(config)
    }
}

fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>> {
    ensure_readable(path, "Certificate file")?;

    let certs = CertificateDer::pem_file_iter(path)
        .map_err(|e| StencilError::tls(format!("Failed to open certificate file {:?}: {}", path, e)))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| StencilError::tls(format!("Failed to parse certificates in {:?}: {}", path, e)))?;

    if certs.is_empty() {
        return Err(StencilError::tls(format!(
            "No certificates found in {:?}",
            path
        )));
    }
    Ok(certs)
}

fn load_key(path: &Path) -> Result<PrivateKeyDer<'static>> {
    ensure_readable(path, "Key file")?;

    PrivateKeyDer::from_pem_file(path)
        .map_err(|e| StencilError::tls(format!("No usable private key in {:?}: {}", path, e)))
}

fn ensure_readable(path: &Path, entity_type: &'static str) -> Result<()> {
    std::fs::metadata(path)
        .map(|_| ())
        .map_err(|e| StencilError::from_io_at(entity_type, path.display().to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
    }

    #[test]
    fn test_valid_pair_builds_server_config() {
        let config = TlsCredentials::new(fixture("cert.pem"), fixture("key.pem"))
            .load()
            .unwrap();
        // HTTP/1.1 only; no ALPN protocols are advertised
        assert!(config.alpn_protocols.is_empty());
    }

    #[test]
    fn test_certificate_as_key_is_rejected() {
        let err = TlsCredentials::new(fixture("cert.pem"), fixture("cert.pem"))
            .load()
            .unwrap_err();
        assert!(matches!(err, StencilError::Tls(_)));
    }

    #[test]
    fn test_missing_files_are_not_found() {
        let credentials = TlsCredentials::new("/nonexistent/cert.pem", "/nonexistent/key.pem");
        let err = credentials.load().unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Certificate file"));
    }

    #[test]
    fn test_empty_certificate_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let cert = temp_dir.path().join("cert.pem");
        let key = temp_dir.path().join("key.pem");
        std::fs::write(&cert, "").unwrap();
        std::fs::write(&key, "").unwrap();

        let err = TlsCredentials::new(&cert, &key).load().unwrap_err();
        assert!(matches!(err, StencilError::Tls(_)));
    }

    #[test]
    fn test_certificate_without_pem_blocks_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let cert = temp_dir.path().join("cert.pem");
        std::fs::write(&cert, "not a pem block\n").unwrap();

        let err = TlsCredentials::new(&cert, temp_dir.path().join("key.pem"))
            .load()
            .unwrap_err();
        // Garbage without PEM markers yields no certificates
        assert!(matches!(err, StencilError::Tls(_)));
    }
}
