//! Parsing errors, re-exported under the parsing namespace.

pub use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};
