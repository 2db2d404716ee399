//! Session state types.

/// A template loaded from disk, kept across retries of the data step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    /// Raw template text.
    pub text: String,
    /// Final path segment; the artifact is written under this name.
    pub output_name: String,
}

/// Rendered output waiting to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub contents: String,
}

/// Where the session currently is within a cycle.
///
/// ```text
/// AwaitTemplatePath ──ok──▶ AwaitDataPath ──ok──▶ Rendered ──▶ AwaitTemplatePath
///        ▲   │ fail                 ▲   │ fail
///        └───┘                      └───┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the template path. Starts every cycle.
    AwaitTemplatePath,
    /// Waiting for the data path; the template has already been read.
    AwaitDataPath { template: TemplateSource },
    /// Output has been rendered and must be persisted.
    Rendered { artifact: Artifact },
}

impl SessionState {
    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::AwaitTemplatePath => "await_template_path",
            SessionState::AwaitDataPath { .. } => "await_data_path",
            SessionState::Rendered { .. } => "rendered",
        }
    }
}

/// Counters reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Cycles that rendered output, whether or not the write succeeded.
    pub rendered: usize,
    /// Artifacts written to the store.
    pub published: usize,
}
