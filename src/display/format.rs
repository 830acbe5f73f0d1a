//! Output formatting modes and traits for compact display
//!
//! A run summary can be printed as the framed text banner, as a single line
//! suitable for CI logs, or as JSON.

use std::str::FromStr;

/// Output formatting modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Framed multi-line summary
    #[default]
    Text,
    /// One-line format for quick scanning and automation
    Compact,
    /// Machine-readable report
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "compact" => Ok(OutputFormat::Compact),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Invalid output format: {}. Valid options: text, compact, json",
                s
            )),
        }
    }
}

/// Trait for types that can be formatted compactly
pub trait CompactFormat {
    /// Convert the type to a compact one-line format
    ///
    /// The output should be:
    /// - Single line (no newlines)
    /// - Include essential information only
    /// - Suitable for CI/CD parsing
    fn to_compact_format(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("COMPACT".parse::<OutputFormat>().unwrap(), OutputFormat::Compact);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[derive(Debug)]
    struct TestStatistics {
        name: String,
        count: usize,
    }

    impl CompactFormat for TestStatistics {
        fn to_compact_format(&self) -> String {
            let clean_name = self.name.replace(['\n', '\r'], " ");
            format!("{}: {} items", clean_name, self.count)
        }
    }

    #[test]
    fn test_compact_format_single_line() {
        let stats = TestStatistics {
            name: "Multi\nLine".to_string(),
            count: 3,
        };
        let compact = stats.to_compact_format();
        assert_eq!(compact, "Multi Line: 3 items");
        assert!(!compact.contains('\n'));
    }
}
