//! ANSI colouring for labels and status messages

#[derive(Copy, Clone)]
enum AnsiColor {
    Arrows,
    Label,
    Value,
    Success,
    Error,
    Confirm,
}

impl AnsiColor {
    fn code(self) -> &'static str {
        match self {
            AnsiColor::Arrows => "2;32",
            AnsiColor::Label => "1;32",
            AnsiColor::Value => "97",
            AnsiColor::Success => "32",
            AnsiColor::Error => "31",
            AnsiColor::Confirm => "2;31",
        }
    }
}

/// Applies colours when enabled and passes text through otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    fn apply(&self, text: &str, color: AnsiColor) -> String {
        if !self.enabled {
            return text.to_string();
        }
        format!("\u{1b}[{}m{}\u{1b}[0m", color.code(), text)
    }

    pub fn arrows(&self, text: &str) -> String {
        self.apply(text, AnsiColor::Arrows)
    }

    pub fn label(&self, text: &str) -> String {
        self.apply(text, AnsiColor::Label)
    }

    pub fn value(&self, text: &str) -> String {
        self.apply(text, AnsiColor::Value)
    }

    pub fn success(&self, text: &str) -> String {
        self.apply(text, AnsiColor::Success)
    }

    pub fn error(&self, text: &str) -> String {
        self.apply(text, AnsiColor::Error)
    }

    pub fn confirm(&self, text: &str) -> String {
        self.apply(text, AnsiColor::Confirm)
    }
}
