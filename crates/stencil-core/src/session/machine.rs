//! The interactive input session.

use std::fs;
use std::path::Path;

use super::prompt::{DATA_PROMPT, Notice, PathRejection, Prompter, TEMPLATE_PROMPT, validate_path};
use super::state::{Artifact, SessionState, SessionSummary, TemplateSource};
use super::store::ArtifactStore;
use crate::config::artifact_url;
use crate::error::Result;
use crate::template::{self, DataMap};

/// Drives the template → data → render → persist cycle.
///
/// The session never finishes a cycle on its own accord; [`InputSession::run`]
/// returns only when the prompter reports end-of-input or fails.
pub struct InputSession<P, S> {
    prompter: P,
    store: S,
    base_url: String,
    summary: SessionSummary,
}

impl<P, S> InputSession<P, S>
where
    P: Prompter,
    S: ArtifactStore,
{
    /// Creates a session that publishes artifacts under `base_url`.
    pub fn new(prompter: P, store: S, base_url: impl Into<String>) -> Self {
        Self {
            prompter,
            store,
            base_url: base_url.into(),
            summary: SessionSummary::default(),
        }
    }

    /// Runs cycles until the prompter reaches end-of-input.
    pub fn run(&mut self) -> Result<SessionSummary> {
        let mut state = SessionState::AwaitTemplatePath;
        while let Some(next) = self.step(state)? {
            state = next;
        }
        tracing::info!(
            rendered = self.summary.rendered,
            published = self.summary.published,
            "Input session ended"
        );
        Ok(self.summary)
    }

    /// Advances the state machine by one transition.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(state))`: the next state
    /// - `Ok(None)`: the prompter reached end-of-input
    /// - `Err(_)`: the prompter failed
    pub fn step(&mut self, state: SessionState) -> Result<Option<SessionState>> {
        tracing::trace!(state = state.label(), "Session step");
        match state {
            SessionState::AwaitTemplatePath => self.acquire_template(),
            SessionState::AwaitDataPath { template } => self.acquire_data(template),
            SessionState::Rendered { artifact } => Ok(Some(self.persist(artifact))),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn acquire_template(&mut self) -> Result<Option<SessionState>> {
        let Some(answer) = self.prompter.ask(TEMPLATE_PROMPT)? else {
            return Ok(None);
        };

        let path = match validate_path(&answer, ".html") {
            Ok(path) => path,
            Err(reason) => {
                self.notify(Notice::InvalidTemplatePath { reason });
                return Ok(Some(SessionState::AwaitTemplatePath));
            }
        };

        let Some(output_name) = output_name(path) else {
            self.notify(Notice::InvalidTemplatePath {
                reason: PathRejection::NoFileName,
            });
            return Ok(Some(SessionState::AwaitTemplatePath));
        };

        match fs::read_to_string(path) {
            Ok(text) => {
                tracing::debug!(path, output_name = %output_name, "Template loaded");
                Ok(Some(SessionState::AwaitDataPath {
                    template: TemplateSource {
                        text,
                        output_name,
                    },
                }))
            }
            Err(e) => {
                tracing::debug!(path, error = %e, "Template could not be read");
                self.notify(Notice::TemplateNotFound {
                    path: path.to_string(),
                });
                Ok(Some(SessionState::AwaitTemplatePath))
            }
        }
    }

    fn acquire_data(&mut self, template: TemplateSource) -> Result<Option<SessionState>> {
        let Some(answer) = self.prompter.ask(DATA_PROMPT)? else {
            return Ok(None);
        };

        let path = match validate_path(&answer, ".json") {
            Ok(path) => path,
            Err(reason) => {
                self.notify(Notice::InvalidDataPath { reason });
                return Ok(Some(SessionState::AwaitDataPath { template }));
            }
        };

        let data = match load_data(path) {
            Ok(data) => data,
            Err(notice) => {
                self.notify(notice);
                return Ok(Some(SessionState::AwaitDataPath { template }));
            }
        };

        let missing = template::missing_keys(&template.text, &data);
        if !missing.is_empty() {
            tracing::debug!(?missing, "Placeholders without data render empty");
        }

        let contents = template::render(&template.text, &data);
        self.summary.rendered += 1;
        Ok(Some(SessionState::Rendered {
            artifact: Artifact {
                name: template.output_name,
                contents,
            },
        }))
    }

    fn persist(&mut self, artifact: Artifact) -> SessionState {
        match self.store.write(&artifact.name, &artifact.contents) {
            Ok(location) => {
                self.summary.published += 1;
                tracing::info!(name = %artifact.name, location = %location.display(), "Artifact written");
                let url = artifact_url(&self.base_url, &artifact.name);
                self.notify(Notice::Published {
                    name: artifact.name,
                    url,
                });
            }
            Err(e) => {
                tracing::warn!(name = %artifact.name, error = %e, "Artifact write failed");
                self.notify(Notice::WriteFailed {
                    name: artifact.name,
                    message: e.to_string(),
                });
            }
        }
        SessionState::AwaitTemplatePath
    }

    fn notify(&mut self, notice: Notice) {
        tracing::debug!(notice = %notice, "Session notice");
        self.prompter.notify(&notice);
    }
}

/// Final path segment of a template path, used as the artifact name.
fn output_name(path: &str) -> Option<String> {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

/// Reads and parses a data file, mapping each failure to the notice the
/// operator sees.
fn load_data(path: &str) -> std::result::Result<DataMap, Notice> {
    let text = fs::read_to_string(path).map_err(|e| {
        tracing::debug!(path, error = %e, "Data file could not be read");
        Notice::DataNotFound {
            path: path.to_string(),
        }
    })?;

    DataMap::from_json_str(&text).map_err(|e| {
        let path = path.to_string();
        let message = e.to_string();
        if e.is_invalid_data() {
            Notice::InvalidData { path, message }
        } else {
            Notice::InvalidJson { path, message }
        }
    })
}
