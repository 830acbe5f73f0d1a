//! Display module for summary formatting and colour output

pub mod colours;
pub mod format;

pub use colours::ColourManager;
pub use format::{CompactFormat, OutputFormat};
