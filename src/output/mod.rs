pub mod formatter;

pub use formatter::{format_json, format_marksheet_table, format_tsv, should_use_colors};
