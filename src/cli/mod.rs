//! CLI module containing argument parsing and validation

pub mod args;

pub use args::{parse_args, parse_items, validate_args, Args, SourceItems};
