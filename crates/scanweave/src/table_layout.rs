//! Geometry-based table rows from word tokens.
//!
//! Alternative to the text heuristics in [`crate::table`] for engines that
//! report word boxes. Words are binned into rows by vertical position and a
//! column break opens where the horizontal gap between neighboring words
//! exceeds twice the mean word height.
//
// TODO: let the spreadsheet writer prefer these rows when the local engine
// contributed tokens, instead of always re-deriving cells from fused text.

use crate::types::{TableGrid, Token};
use std::collections::BTreeMap;

/// Words at or below this confidence are ignored.
const MIN_CONFIDENCE: f32 = 60.0;
/// Floor for the row bin size, in pixels.
const MIN_ROW_HEIGHT: i32 = 20;

/// Bin confident tokens into a row/column grid by their word boxes.
pub fn rows_from_tokens(tokens: &[Token]) -> TableGrid {
    let confident: Vec<&Token> = tokens
        .iter()
        .filter(|token| token.confidence > MIN_CONFIDENCE)
        .collect();
    if confident.is_empty() {
        return TableGrid::new();
    }

    let mean_height = {
        let sum: i64 = confident.iter().map(|t| i64::from(t.bounding_box.height)).sum();
        let mean = (sum / confident.len() as i64) as i32;
        mean.max(MIN_ROW_HEIGHT)
    };

    let mut bins: BTreeMap<i32, Vec<&Token>> = BTreeMap::new();
    for token in &confident {
        bins.entry(token.bounding_box.y / mean_height).or_default().push(token);
    }

    let mut grid = TableGrid::new();
    for (_, mut row_tokens) in bins {
        row_tokens.sort_by_key(|token| token.bounding_box.x);

        let mut cells: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut previous_right: Option<i32> = None;

        for token in row_tokens {
            let breaks_column = previous_right
                .is_some_and(|right| token.bounding_box.x - right > 2 * mean_height);
            if breaks_column {
                cells.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&token.text);
            previous_right = Some(token.bounding_box.x + token.bounding_box.width);
        }
        if !current.is_empty() {
            cells.push(current);
        }
        grid.push_row(cells);
    }

    grid
}
