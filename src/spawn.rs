//! Rejection-sampling placement of food and obstacles.

use std::collections::HashSet;

use rand::Rng;

use crate::config::{OBSTACLE_COUNT_MAX, OBSTACLE_COUNT_MIN, OBSTACLE_PLACEMENT_RETRIES};
use crate::grid::{Grid, Position};
use crate::snake::Snake;

/// Draws grid-aligned candidates until one is free of the snake and every
/// obstacle. Unbounded retries: the occupied fraction of the board stays
/// small, so the loop terminates quickly in practice.
#[must_use]
pub fn place_food<R: Rng + ?Sized>(
    rng: &mut R,
    grid: Grid,
    snake: &Snake,
    obstacles: &HashSet<Position>,
) -> Position {
    loop {
        let candidate = grid.random_cell(rng);
        if !snake.occupies(candidate) && !obstacles.contains(&candidate) {
            return candidate;
        }
    }
}

/// Places the obstacle set for one obstacle-mode session.
///
/// The target count is sampled uniformly from [5,12]. Each obstacle gets up
/// to 50 attempts; a candidate is rejected when it overlaps the snake, an
/// already-placed obstacle, or the spawn exclusion zone around `anchor`.
/// Exhausting the attempts skips that obstacle, so the final set may be
/// smaller than the target but never larger.
#[must_use]
pub fn place_obstacles<R: Rng + ?Sized>(
    rng: &mut R,
    grid: Grid,
    snake: &Snake,
    anchor: Position,
) -> HashSet<Position> {
    let target = rng.gen_range(OBSTACLE_COUNT_MIN..=OBSTACLE_COUNT_MAX);
    let mut obstacles = HashSet::new();

    for _ in 0..target {
        for _ in 0..OBSTACLE_PLACEMENT_RETRIES {
            let candidate = grid.random_cell(rng);
            if snake.occupies(candidate)
                || obstacles.contains(&candidate)
                || in_spawn_zone(grid, anchor, candidate)
            {
                continue;
            }
            obstacles.insert(candidate);
            break;
        }
    }

    obstacles
}

/// 3×2-cell exclusion zone around the spawn anchor: the anchor's row and the
/// row above it, one cell to each side.
fn in_spawn_zone(grid: Grid, anchor: Position, candidate: Position) -> bool {
    let cell = grid.cell_size();
    let dx = (candidate.x - anchor.x) / cell;
    let dy = (candidate.y - anchor.y) / cell;
    (-1..=1).contains(&dx) && (-1..=0).contains(&dy)
}
