//! Fixed locations under the installation root.
//!
//! # Directory Structure
//!
//! ```text
//! <root>/
//! ├── ssl/
//! │   ├── key.pem      # TLS private key (PEM)
//! │   └── cert.pem     # TLS certificate chain (PEM)
//! └── results/         # Generated artifacts, served over HTTPS
//!     └── .gitignore   # Never listed
//! ```

use std::path::{Path, PathBuf};

/// Directory holding the TLS key pair.
pub const SSL_DIR: &str = "ssl";

/// Private key file name inside [`SSL_DIR`].
pub const KEY_FILE: &str = "key.pem";

/// Certificate file name inside [`SSL_DIR`].
pub const CERT_FILE: &str = "cert.pem";

/// Directory generated artifacts are written to.
pub const RESULTS_DIR: &str = "results";

/// Resolves every path Stencil touches from a single root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StencilPaths {
    root: PathBuf,
}

impl StencilPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ssl_dir(&self) -> PathBuf {
        self.root.join(SSL_DIR)
    }

    /// Path to the PEM private key.
    pub fn key_file(&self) -> PathBuf {
        self.ssl_dir().join(KEY_FILE)
    }

    /// Path to the PEM certificate chain.
    pub fn cert_file(&self) -> PathBuf {
        self.ssl_dir().join(CERT_FILE)
    }

    /// Path to the shared results directory.
    pub fn results_dir(&self) -> PathBuf {
        self.root.join(RESULTS_DIR)
    }
}
