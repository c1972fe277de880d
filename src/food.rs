use std::ops::RangeInclusive;

use rand::Rng;
use tracing::warn;

use crate::config::GridSize;
use crate::error::EngineError;
use crate::snake::{Cell, Snake};

/// Inclusive column and row ranges food may be placed in.
///
/// Food keeps a one-cell margin from the border.
#[must_use]
pub fn food_region(bounds: GridSize) -> (RangeInclusive<i32>, RangeInclusive<i32>) {
    let cols = 1..=i32::from(bounds.width) - 2;
    let rows = 1..=i32::from(bounds.height) - 2;
    (cols, rows)
}

/// Picks a uniformly random free cell inside the food region.
///
/// Samples up to `retry_budget` candidates and rejects occupied ones. When the
/// budget runs out the free cells are enumerated and one is chosen directly,
/// so the result is still uniform over free cells. Fails only when the snake
/// covers the whole region.
pub fn place_food<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
    retry_budget: u32,
) -> Result<Cell, EngineError> {
    let (cols, rows) = food_region(bounds);
    if cols.is_empty() || rows.is_empty() {
        return Err(no_free_cell(bounds, 0));
    }

    for _ in 0..retry_budget {
        let candidate = Cell::new(rng.gen_range(cols.clone()), rng.gen_range(rows.clone()));
        if !snake.occupies(candidate) {
            return Ok(candidate);
        }
    }

    warn!(
        retry_budget,
        snake_len = snake.len(),
        "food sampling budget exhausted, enumerating free cells"
    );

    let candidates: Vec<Cell> = rows
        .flat_map(|row| cols.clone().map(move |col| Cell::new(col, row)))
        .filter(|cell| !snake.occupies(*cell))
        .collect();

    if candidates.is_empty() {
        return Err(no_free_cell(bounds, retry_budget));
    }

    let index = rng.gen_range(0..candidates.len());
    Ok(candidates[index])
}

fn no_free_cell(bounds: GridSize, attempts: u32) -> EngineError {
    EngineError::NoFreeCell {
        width: bounds.width,
        height: bounds.height,
        attempts,
    }
}
