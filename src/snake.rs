use std::collections::VecDeque;

use crate::grid::Position;

/// Snake body, head at the front. Mutated only by the engine during a tick;
/// direction handling lives in the engine, which commits at most one heading
/// change per tick.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    /// Spawns a snake of `length` segments with its head at `anchor` and the
    /// body extending to the left, one cell apart.
    #[must_use]
    pub fn spawn(anchor: Position, length: usize, cell_size: i32) -> Self {
        debug_assert!(length >= 1);
        let body = (0..length)
            .map(|i| Position {
                x: anchor.x - i32::try_from(i).unwrap_or(0) * cell_size,
                y: anchor.y,
            })
            .collect();
        Self { body }
    }

    /// Builds a snake from explicit segments, head first.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>) -> Self {
        debug_assert!(!segments.is_empty());
        Self {
            body: VecDeque::from(segments),
        }
    }

    /// Returns the head position.
    #[must_use]
    pub fn head(&self) -> Position {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Commits one movement step: the new head goes in front and, unless the
    /// snake grew this tick, the tail is dropped.
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.push_front(new_head);
        if !grow {
            let _ = self.body.pop_back();
        }
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Iterates over segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    /// Returns the tail segment.
    #[must_use]
    pub fn tail(&self) -> Option<Position> {
        self.body.back().copied()
    }
}
