//! The operator-facing side of the input session.

use std::fmt;

use crate::error::Result;

/// Question asked at the start of every cycle.
pub const TEMPLATE_PROMPT: &str = "Template file (.html): ";

/// Question asked once a template has been loaded.
pub const DATA_PROMPT: &str = "Data file (.json): ";

/// A line-oriented question/answer channel.
///
/// The session only ever asks one question at a time and waits for the
/// answer; implementations may block.
pub trait Prompter {
    /// Asks a question and returns the operator's answer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(line))`: a line was entered (without the trailing newline)
    /// - `Ok(None)`: the channel reached end-of-input or was interrupted
    /// - `Err(_)`: the channel failed
    fn ask(&mut self, question: &str) -> Result<Option<String>>;

    /// Reports the outcome of a step to the operator.
    fn notify(&mut self, notice: &Notice);
}

/// Why a prompted path was refused before any file was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathRejection {
    /// Nothing was entered.
    Empty,
    /// The path does not mention the required extension.
    MissingExtension { expected: &'static str },
    /// The path has no final segment to name the output after.
    NoFileName,
}

impl fmt::Display for PathRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathRejection::Empty => write!(f, "no path entered"),
            PathRejection::MissingExtension { expected } => {
                write!(f, "the path must point to a {} file", expected)
            }
            PathRejection::NoFileName => write!(f, "the path does not end in a file name"),
        }
    }
}

/// Checks a prompted path: non-empty and containing `expected` somewhere.
///
/// The check is a substring test, so `page.html.bak` passes for `.html`.
pub fn validate_path<'a>(input: &'a str, expected: &'static str) -> std::result::Result<&'a str, PathRejection> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PathRejection::Empty);
    }
    if !trimmed.contains(expected) {
        return Err(PathRejection::MissingExtension { expected });
    }
    Ok(trimmed)
}

/// Something the session tells the operator between prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    InvalidTemplatePath { reason: PathRejection },
    TemplateNotFound { path: String },
    InvalidDataPath { reason: PathRejection },
    DataNotFound { path: String },
    /// The data file exists but is not valid JSON.
    InvalidJson { path: String, message: String },
    /// The data file is valid JSON but not an object.
    InvalidData { path: String, message: String },
    WriteFailed { name: String, message: String },
    /// An artifact was written and can be fetched at `url`.
    Published { name: String, url: String },
}

impl Notice {
    /// True for notices that report a failed step.
    pub fn is_error(&self) -> bool {
        !matches!(self, Notice::Published { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::InvalidTemplatePath { reason } => write!(f, "Invalid template path: {}", reason),
            Notice::TemplateNotFound { path } => write!(f, "Template not found: {}", path),
            Notice::InvalidDataPath { reason } => write!(f, "Invalid data path: {}", reason),
            Notice::DataNotFound { path } => write!(f, "Data file not found: {}", path),
            Notice::InvalidJson { path, message } => {
                write!(f, "Invalid JSON in {}: {}", path, message)
            }
            Notice::InvalidData { path, message } => {
                write!(f, "Unusable data in {}: {}", path, message)
            }
            Notice::WriteFailed { name, message } => {
                write!(f, "Could not write {}: {}", name, message)
            }
            Notice::Published { url, .. } => write!(f, "Generated file served at {}", url),
        }
    }
}
