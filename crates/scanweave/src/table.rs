//! Heuristic table reconstruction from line-delimited text.
//!
//! Each line becomes one row. The cell separator is chosen per line with a
//! fixed precedence: pipes win over tabs, tabs win over runs of two or more
//! spaces, and a line with none of those is a single-cell row. Cells are
//! trimmed and empty cells dropped; a line whose cells all trim away still
//! produces a row, so blank separator lines keep their place in the grid.

use crate::types::TableGrid;

lazy_static::lazy_static! {
    static ref MULTI_SPACE: regex::Regex = regex::Regex::new(r" {2,}").unwrap();
}

/// Split recognized text into a row/column grid.
pub fn reconstruct_table(text: &str) -> TableGrid {
    let mut grid = TableGrid::new();
    for line in text.trim().lines() {
        grid.push_row(split_row(line));
    }
    grid
}

fn split_row(line: &str) -> Vec<String> {
    let raw: Vec<&str> = if line.contains('|') {
        line.split('|').collect()
    } else if line.contains('\t') {
        line.split('\t').collect()
    } else if MULTI_SPACE.is_match(line) {
        MULTI_SPACE.split(line).collect()
    } else {
        vec![line]
    };

    raw.into_iter()
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(String::from)
        .collect()
}
