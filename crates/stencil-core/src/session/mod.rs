//! Interactive input session.
//!
//! One cycle asks for a template path, then a data path, renders the
//! template and hands the output to an [`ArtifactStore`]. Failed steps are
//! reported through the [`Prompter`] and retried; only end-of-input stops
//! the loop.

pub mod machine;
pub mod prompt;
pub mod state;
pub mod store;

pub use machine::InputSession;
pub use prompt::{DATA_PROMPT, Notice, PathRejection, Prompter, TEMPLATE_PROMPT, validate_path};
pub use state::{Artifact, SessionState, SessionSummary, TemplateSource};
pub use store::ArtifactStore;
