//! Artifact store trait.

use std::path::PathBuf;

use crate::error::Result;

/// Destination for rendered artifacts.
///
/// Decouples the session from where generated files live. The filesystem
/// implementation writes into the shared results directory the server reads.
pub trait ArtifactStore {
    /// Writes `contents` under `name`, replacing any existing artifact.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: location the artifact was written to
    /// - `Err(_)`: the artifact could not be written
    fn write(&self, name: &str, contents: &str) -> Result<PathBuf>;
}
