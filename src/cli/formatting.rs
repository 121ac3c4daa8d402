//! ANSI styling for help text and error messages.

const RESET: &str = "\x1b[0m";

/// Role a piece of CLI output plays, each with its own terminal style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Program name at the top of the help
    Title,
    /// Section heading such as "Usage:"
    Heading,
    /// Command category
    Category,
    /// Command name
    Command,
    /// Arguments, examples and descriptions
    Muted,
    /// Error reported before exiting
    Error,
}

impl Style {
    fn escape(self) -> &'static str {
        match self {
            Style::Title => "\x1b[1;36m",
            Style::Heading => "\x1b[1;33m",
            Style::Category => "\x1b[1;34m",
            Style::Command => "\x1b[1;32m",
            Style::Muted => "\x1b[2m",
            Style::Error => "\x1b[1;31m",
        }
    }

    /// Wraps `text` in this style, resetting afterwards.
    pub fn paint(self, text: &str) -> String {
        format!("{}{text}{RESET}", self.escape())
    }
}
