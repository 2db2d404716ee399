pub mod paths;
pub mod results_dir;
pub mod tls;

pub use crate::paths::StencilPaths;
pub use crate::results_dir::{IGNORED_ENTRY, ResultsDirectory};
pub use crate::tls::TlsCredentials;
