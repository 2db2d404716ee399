pub mod config;
pub mod error;
pub mod session;
pub mod template;

// Re-export common types
pub use config::AppConfig;
pub use error::{Result, StencilError};
pub use session::{ArtifactStore, InputSession, Notice, Prompter};
pub use template::{DataMap, render};
