use std::io::IsTerminal;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::marksheet::{Column, Marksheet};

const SEPARATOR: &str = "  ";
const MIN_NAME_WIDTH: usize = 8;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn left_aligned(column: &Column) -> bool {
    matches!(column, Column::Name | Column::AdmissionNo | Column::Class)
}

fn pad(text: &str, width: usize, left: bool) -> String {
    if left {
        format!("{:<width$}", text, width = width)
    } else {
        format!("{:>width$}", text, width = width)
    }
}

/// Format the marksheet as an aligned table: header, body rows, footer rows.
/// The Name column is truncated when the table is wider than the terminal.
pub fn format_marksheet_table(marksheet: &Marksheet, use_colors: bool) -> String {
    format_table_with_width(marksheet, use_colors, get_terminal_width())
}

fn format_table_with_width(marksheet: &Marksheet, use_colors: bool, term_width: Option<usize>) -> String {
    if marksheet.rows.is_empty() {
        return "No students found.".to_string();
    }

    let headers = marksheet.headers();
    let body = marksheet.body();
    let footers: Vec<&Vec<String>> = marksheet.footers.iter().map(|f| &f.cells).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for cells in body.iter().chain(footers.iter().copied()) {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    // Shrink the Name column to fit the terminal
    if let (Some(term), Some(name_idx)) = (
        term_width,
        marksheet.columns.iter().position(|c| *c == Column::Name),
    ) {
        let line_width: usize = widths.iter().sum::<usize>() + SEPARATOR.len() * (widths.len() - 1);
        if line_width > term {
            let overflow = line_width - term;
            widths[name_idx] = widths[name_idx].saturating_sub(overflow).max(MIN_NAME_WIDTH);
        }
    }

    let render = |cells: &[String]| -> String {
        marksheet
            .columns
            .iter()
            .zip(cells)
            .zip(&widths)
            .map(|((column, cell), &width)| pad(&truncate_text(cell, width), width, left_aligned(column)))
            .collect::<Vec<_>>()
            .join(SEPARATOR)
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(body.len() + footers.len() + 2);

    let header_line = render(headers.as_slice());
    let rule = "-".repeat(header_line.chars().count());
    if use_colors {
        lines.push(header_line.bold().to_string());
        lines.push(rule.dimmed().to_string());
    } else {
        lines.push(header_line);
        lines.push(rule);
    }

    for cells in &body {
        lines.push(render(cells.as_slice()));
    }

    for cells in footers {
        let line = render(cells.as_slice());
        if use_colors {
            lines.push(line.dimmed().to_string());
        } else {
            lines.push(line);
        }
    }

    lines.join("\n")
}

/// Format the marksheet as tab-separated values for spreadsheets and scripts
/// Header row, body rows, then footer rows (no colors)
pub fn format_tsv(marksheet: &Marksheet) -> String {
    let mut lines = vec![marksheet.headers().join("\t")];
    lines.extend(marksheet.body().iter().map(|cells| cells.join("\t")));
    lines.extend(marksheet.footers.iter().map(|f| f.cells.join("\t")));
    lines.join("\n")
}

/// Format the full marksheet structure as pretty JSON
pub fn format_json(marksheet: &Marksheet) -> Result<String> {
    serde_json::to_string_pretty(marksheet).context("Failed to serialize marksheet")
}
