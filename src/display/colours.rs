//! Colour handling for CLI output
//!
//! Honours `--no-color` and the NO_COLOR convention, degrading to plain text
//! when colours are off.

use colored::{ColoredString, Colorize};
use std::env;

/// Applies colours to summary output when enabled
#[derive(Debug, Clone)]
pub struct ColourManager {
    enabled: bool,
}

impl ColourManager {
    /// Colours on unless NO_COLOR is set
    pub fn new() -> Self {
        Self {
            enabled: env::var_os("NO_COLOR").is_none(),
        }
    }

    /// Create a ColourManager with explicit colour control
    pub fn with_colours(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Create a ColourManager from the CLI flag, NO_COLOR still applies
    pub fn from_args(no_color_flag: bool) -> Self {
        if no_color_flag {
            Self::with_colours(false)
        } else {
            Self::new()
        }
    }

    pub fn colours_enabled(&self) -> bool {
        self.enabled
    }

    pub fn success(&self, text: &str) -> ColoredString {
        if self.enabled {
            text.green().bold()
        } else {
            text.normal()
        }
    }

    pub fn error(&self, text: &str) -> ColoredString {
        if self.enabled {
            text.red().bold()
        } else {
            text.normal()
        }
    }

    pub fn highlight(&self, text: &str) -> ColoredString {
        if self.enabled {
            text.cyan()
        } else {
            text.normal()
        }
    }

    /// Green for a passing verdict, red otherwise
    pub fn verdict(&self, ok: bool) -> ColoredString {
        let text = ok.to_string();
        if ok {
            self.success(&text)
        } else {
            self.error(&text)
        }
    }
}

impl Default for ColourManager {
    fn default() -> Self {
        Self::new()
    }
}
