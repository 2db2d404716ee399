//! rustyline-backed prompter for the interactive session.

use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use stencil_core::error::{Result, StencilError};
use stencil_core::session::{Notice, Prompter};

/// Helper that completes file paths and dims the prompt.
struct PathHelper {
    completer: FilenameCompleter,
}

impl PathHelper {
    fn new() -> Self {
        Self {
            completer: FilenameCompleter::new(),
        }
    }
}

impl Helper for PathHelper {}

impl Completer for PathHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        self.completer.complete(line, pos, ctx)
    }
}

impl Highlighter for PathHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default {
            Owned(prompt.bright_cyan().to_string())
        } else {
            Borrowed(prompt)
        }
    }
}

impl Hinter for PathHelper {
    type Hint = String;
}

impl Validator for PathHelper {}

/// Reads answers from the terminal and prints notices in colour.
pub struct ReadlinePrompter {
    editor: Editor<PathHelper, DefaultHistory>,
}

impl ReadlinePrompter {
    pub fn new() -> Result<Self> {
        let mut editor = Editor::<PathHelper, DefaultHistory>::new()
            .map_err(|e| StencilError::prompt(format!("Failed to open line editor: {}", e)))?;
        editor.set_helper(Some(PathHelper::new()));
        Ok(Self { editor })
    }
}

impl Prompter for ReadlinePrompter {
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        match self.editor.readline(question) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Exiting...".yellow());
                Ok(None)
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                Ok(None)
            }
            Err(err) => Err(StencilError::prompt(err.to_string())),
        }
    }

    fn notify(&mut self, notice: &Notice) {
        let text = notice.to_string();
        if notice.is_error() {
            println!("{}", text.red());
        } else {
            println!("{}", text.bright_green());
        }
    }
}
