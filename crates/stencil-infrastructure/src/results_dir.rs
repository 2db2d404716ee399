//! The shared results directory.
//!
//! The input session writes artifacts here and the HTTPS server reads them
//! back on every request. There is no locking between the two: writes go
//! through a temporary file and an atomic rename so readers never see a
//! half-written artifact.

use std::fs;
use std::io::Write as IoWrite;
use std::path::{Component, Path, PathBuf};

use stencil_core::error::{Result, StencilError};
use stencil_core::session::ArtifactStore;

/// Entry that exists only to keep the directory under version control.
pub const IGNORED_ENTRY: &str = ".gitignore";

// In-flight writes are named `.stencil-XXXXXX.partial`. The random part is
// alphanumeric, so a temp name never contains `.html` and never collides
// with an artifact name.
const TEMP_PREFIX: &str = ".stencil-";
const TEMP_SUFFIX: &str = ".partial";
const TEMP_RAND_BYTES: usize = 6;

/// Handle to the directory holding generated artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsDirectory {
    path: PathBuf,
}

impl ResultsDirectory {
    /// Creates a handle without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the directory (and parents) if needed and returns a handle to it.
    pub fn open_or_create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            fs::create_dir_all(&path)?;
            tracing::info!("Created results directory: {:?}", path);
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Maps a client supplied file name onto a path inside the directory.
    ///
    /// The name must be exactly one ordinary path component: separators,
    /// `.`/`..`, roots and drive prefixes are rejected.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: a path directly under the results directory
    /// - `Err(StencilError::InvalidPath)`: the name could escape the directory
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() {
            return Err(StencilError::invalid_path("empty file name"));
        }
        if name.contains(['/', '\\', '\0']) {
            return Err(StencilError::invalid_path(format!(
                "'{}' is not a plain file name",
                name
            )));
        }

        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => Ok(self.path.join(part)),
            _ => Err(StencilError::invalid_path(format!(
                "'{}' is not a plain file name",
                name
            ))),
        }
    }

    /// Lists the immediate entries of the directory, sorted by name.
    ///
    /// Subdirectories are listed but not descended into. [`IGNORED_ENTRY`]
    /// and in-flight temporary files are skipped.
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut reader = tokio::fs::read_dir(&self.path)
            .await
            .map_err(|e| StencilError::from_io_at("Results directory", self.display(), e))?;

        let mut names = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name == IGNORED_ENTRY || is_temp_name(&name) {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    /// Reads an artifact's raw bytes.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.resolve(name)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| StencilError::from_io_at("File", name, e))
    }

    fn display(&self) -> String {
        self.path.display().to_string()
    }
}

impl ArtifactStore for ResultsDirectory {
    fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let target = self.resolve(name)?;

        // Write to temporary file in the same directory; it is removed on drop
        // unless persisted
        let mut tmp_file = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .rand_bytes(TEMP_RAND_BYTES)
            .tempfile_in(&self.path)?;
        tmp_file.write_all(contents.as_bytes())?;
        tmp_file.as_file().sync_all()?;
        tmp_file.persist(&target).map_err(|e| e.error)?;

        tracing::debug!("Wrote artifact {:?} ({} bytes)", target, contents.len());
        Ok(target)
    }
}

fn is_temp_name(name: &str) -> bool {
    name.strip_prefix(TEMP_PREFIX)
        .and_then(|rest| rest.strip_suffix(TEMP_SUFFIX))
        .is_some_and(|token| {
            token.len() == TEMP_RAND_BYTES && token.chars().all(|c| c.is_ascii_alphanumeric())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ResultsDirectory) {
        let temp_dir = TempDir::new().unwrap();
        let results = ResultsDirectory::open_or_create(temp_dir.path().join("results")).unwrap();
        (temp_dir, results)
    }

    #[test]
    fn test_open_or_create_makes_directory() {
        let (temp_dir, results) = setup();
        assert!(results.path().is_dir());
        assert_eq!(results.path(), temp_dir.path().join("results"));
    }

    #[test]
    fn test_write_creates_and_overwrites() {
        let (_temp_dir, results) = setup();

        let path = results.write("page.html", "first").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");

        results.write("page.html", "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");

        // No temp file is left behind
        let entries: Vec<_> = fs::read_dir(results.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_accepts_names_near_the_length_limit() {
        let (_temp_dir, results) = setup();
        let name = format!("{}.html", "a".repeat(245));

        let path = results.write(&name, "long").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "long");
    }

    #[test]
    fn test_temp_names_cannot_match_artifacts() {
        assert!(is_temp_name(".stencil-a1B2c3.partial"));
        assert!(!is_temp_name(".x.html.partial"));
        assert!(!is_temp_name(".stencil-page.html.partial"));
        assert!(!is_temp_name("page.html"));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let results = ResultsDirectory::new(temp_dir.path().join("gone"));
        let err = results.write("page.html", "x").unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_resolve_accepts_plain_names() {
        let results = ResultsDirectory::new("/srv/results");
        assert_eq!(
            results.resolve("index.html").unwrap(),
            PathBuf::from("/srv/results/index.html")
        );
        assert!(results.resolve("my page.html").is_ok());
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let results = ResultsDirectory::new("/srv/results");
        for name in ["", ".", "..", "../secret", "a/b.html", "/etc/passwd", "..\\boot.ini", "a\0b"] {
            let err = results.resolve(name).unwrap_err();
            assert!(err.is_invalid_path(), "{:?} should be rejected", name);
        }
    }

    #[tokio::test]
    async fn test_list_skips_ignore_file_and_sorts() {
        let (_temp_dir, results) = setup();
        fs::write(results.path().join(IGNORED_ENTRY), "*\n").unwrap();
        results.write("b.html", "b").unwrap();
        results.write("a.html", "a").unwrap();
        fs::create_dir(results.path().join("sub")).unwrap();
        fs::write(results.path().join("sub").join("nested.html"), "n").unwrap();

        let names = results.list().await.unwrap();
        assert_eq!(names, vec!["a.html", "b.html", "sub"]);
    }

    #[tokio::test]
    async fn test_list_shows_dotted_artifacts_and_hides_in_flight_writes() {
        let (_temp_dir, results) = setup();
        results.write(".x.html.partial", "real").unwrap();
        fs::write(results.path().join(".stencil-Ab12Cd.partial"), "in flight").unwrap();

        let names = results.list().await.unwrap();
        assert_eq!(names, vec![".x.html.partial"]);
    }

    #[tokio::test]
    async fn test_list_empty_directory() {
        let (_temp_dir, results) = setup();
        fs::write(results.path().join(IGNORED_ENTRY), "").unwrap();
        assert!(results.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_missing_directory_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let results = ResultsDirectory::new(temp_dir.path().join("missing"));
        let err = results.list().await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_read_returns_raw_bytes() {
        let (_temp_dir, results) = setup();
        fs::write(results.path().join("logo.bin"), [0u8, 159, 146, 150]).unwrap();
        assert_eq!(results.read("logo.bin").await.unwrap(), vec![0u8, 159, 146, 150]);
    }

    #[tokio::test]
    async fn test_read_missing_file_is_not_found() {
        let (_temp_dir, results) = setup();
        assert!(results.read("nope.html").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_read_never_leaves_directory() {
        let (temp_dir, results) = setup();
        fs::write(temp_dir.path().join("secret.txt"), "top secret").unwrap();
        let err = results.read("../secret.txt").await.unwrap_err();
        assert!(err.is_invalid_path());
    }
}
