//! Stateless collision predicates, checked every tick after the head moved.

use std::collections::HashSet;

use crate::grid::Position;
use crate::modes::Mode;
use crate::snake::Snake;

/// Returns true when `head` overlaps any non-head segment of the updated
/// body. The body passed in is the post-tick one (after growth or tail
/// drop), so a head moving into a cell the tail just vacated is not fatal.
#[must_use]
pub fn hits_self(head: Position, snake: &Snake) -> bool {
    snake.segments().skip(1).any(|segment| *segment == head)
}

/// Returns true when `head` sits on an obstacle cell. Only obstacle mode
/// carries obstacles; other modes always pass.
#[must_use]
pub fn hits_obstacle(head: Position, obstacles: &HashSet<Position>, mode: Mode) -> bool {
    mode == Mode::Obstacle && obstacles.contains(&head)
}
