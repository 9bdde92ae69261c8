//! Output formatting for CLI.

mod json;

pub use json::JsonFormatter;
#[cfg(test)]
mod tests;
