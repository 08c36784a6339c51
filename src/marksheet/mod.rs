//! Marksheet computation: raw scores in, graded and ranked rows out.
//!
//! ```text
//!  RawTable ─► classify ─► normalize ─► grading ─► exclusion ─► ranking ─► footer ─► present
//! ```
//!
//! Every stage is a pure function over borrowed input.
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod exclusion;
pub mod footer;
pub mod grading;
pub mod model;
pub mod normalize;
pub mod present;
pub mod ranking;
pub mod table;
pub mod validation;

pub use classify::{classify_columns, ColumnLayout, IdentityPolicy};
pub use config::*;
pub use engine::compute_marksheet;
pub use error::MarksheetError;
pub use model::{Column, FooterRow, Marksheet, MarksheetRow, SubjectCell};
pub use present::rescale_totals;
pub use table::{Cell, RawRow, RawTable};
pub use validation::validate_marksheet;
