use thiserror::Error;

/// Fatal engine failures. Cell-level and configuration problems are
/// recovered with default values and never surface here.
#[derive(Debug, Error, PartialEq)]
pub enum MarksheetError {
    /// No column could be identified as the student name.
    #[error("no student name column found (columns: {})", columns.join(", "))]
    MissingNameColumn { columns: Vec<String> },
}
