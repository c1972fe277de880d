use std::collections::VecDeque;

use crate::config::GridSize;
use crate::input::Direction;

/// Grid cell addressed by column and row.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Returns true when the cell lies inside `[0, width) × [0, height)`.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.col >= 0
            && self.row >= 0
            && self.col < i32::from(bounds.width)
            && self.row < i32::from(bounds.height)
    }

    /// Returns the neighbouring cell one step in `direction`.
    #[must_use]
    pub fn stepped(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            col: self.col + dx,
            row: self.row + dy,
        }
    }

    /// Returns true when `other` shares an edge with this cell.
    #[must_use]
    pub fn is_adjacent_to(self, other: Self) -> bool {
        (self.col - other.col).abs() + (self.row - other.row).abs() == 1
    }
}

/// Ordered snake body, head first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    /// Creates a one-cell snake at `start`.
    #[must_use]
    pub fn new(start: Cell) -> Self {
        Self {
            body: VecDeque::from([start]),
        }
    }

    /// Creates a snake from explicit segments (front is head).
    ///
    /// Returns `None` for an empty body.
    #[must_use]
    pub fn from_segments(segments: Vec<Cell>) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }

        Some(Self {
            body: VecDeque::from(segments),
        })
    }

    /// Returns the current head cell.
    #[must_use]
    pub fn head(&self) -> Cell {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns true if any segment occupies `cell`.
    #[must_use]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Returns true if any segment except the tail occupies `cell`.
    #[must_use]
    pub fn occupies_ignoring_tail(&self, cell: Cell) -> bool {
        let keep = self.body.len() - 1;
        self.body.iter().take(keep).any(|segment| *segment == cell)
    }

    /// Returns true when every pair of consecutive segments is adjacent and no
    /// cell repeats.
    #[must_use]
    pub fn is_connected_path(&self) -> bool {
        let adjacent = self
            .body
            .iter()
            .zip(self.body.iter().skip(1))
            .all(|(a, b)| a.is_adjacent_to(*b));

        let unique = self
            .body
            .iter()
            .enumerate()
            .all(|(i, cell)| !self.body.iter().skip(i + 1).any(|other| other == cell));

        adjacent && unique
    }

    pub(crate) fn push_head(&mut self, cell: Cell) {
        self.body.push_front(cell);
    }

    pub(crate) fn drop_tail(&mut self) {
        if self.body.len() > 1 {
            let _ = self.body.pop_back();
        }
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake keeps at least its head.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }
}
