//! Terminal prompts: line editing, word completion and history hints

use anyhow::Result;
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use tagg_core::form::{COMMAND_BACK, COMMAND_QUIT};

use crate::palette::Palette;

/// One answer typed at a field prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptInput {
    Value(String),
    Back,
    Quit,
}

impl PromptInput {
    pub fn classify(line: &str) -> Self {
        match line.trim() {
            COMMAND_BACK => PromptInput::Back,
            COMMAND_QUIT => PromptInput::Quit,
            _ => PromptInput::Value(line.to_string()),
        }
    }
}

/// Source of interactive answers. The terminal implementation is backed by
/// rustyline; tests drive the session with a scripted one.
pub trait Prompter {
    /// Words offered for completion from now on.
    fn set_completions(&mut self, words: Vec<String>);

    /// Ask for a field value, pre-filled with `default`.
    fn read_field(&mut self, label: &str, default: &str) -> Result<PromptInput>;

    /// Ask a free-form question. `None` means the user hung up (Ctrl-C/Ctrl-D).
    fn ask(&mut self, message: &str) -> Result<Option<String>>;
}

struct TagHelper {
    words: Vec<String>,
    hinter: HistoryHinter,
}

impl Completer for TagHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        Ok(complete_word(&self.words, line, pos))
    }
}

impl Hinter for TagHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for TagHelper {}

impl Validator for TagHelper {}

impl Helper for TagHelper {}

/// Complete the word under the cursor from `words`.
/// Returns the byte offset where the word starts and the candidates.
pub(crate) fn complete_word(words: &[String], line: &str, pos: usize) -> (usize, Vec<String>) {
    let head = &line[..pos];
    let start = head
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let prefix = &head[start..];
    let candidates = words
        .iter()
        .filter(|w| w.starts_with(prefix))
        .cloned()
        .collect();
    (start, candidates)
}

pub struct TerminalPrompter {
    editor: Editor<TagHelper, DefaultHistory>,
    palette: Palette,
}

impl TerminalPrompter {
    pub fn new(palette: Palette) -> Result<Self> {
        let mut editor = Editor::<TagHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(TagHelper {
            words: Vec::new(),
            hinter: HistoryHinter {},
        }));
        Ok(Self { editor, palette })
    }
}

impl Prompter for TerminalPrompter {
    fn set_completions(&mut self, words: Vec<String>) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.words = words;
        }
    }

    fn read_field(&mut self, label: &str, default: &str) -> Result<PromptInput> {
        let prompt = format!(
            "{} {} ",
            self.palette.label(label),
            self.palette.arrows(">>>")
        );
        match self.editor.readline_with_initial(&prompt, (default, "")) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(PromptInput::classify(&line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(PromptInput::Quit),
            Err(err) => Err(err.into()),
        }
    }

    fn ask(&mut self, message: &str) -> Result<Option<String>> {
        match self.editor.readline(message) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
