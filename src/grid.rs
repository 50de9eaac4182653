use rand::Rng;

use crate::config::ConfigError;

/// Board position in logical pixels, always a multiple of the cell size.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// Square board geometry: edge length and cell size in logical pixels.
///
/// Replaces loose `(board, cell)` integer pairs so the multiple-of-cell-size
/// invariant is established once, at construction.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Grid {
    board_size: i32,
    cell_size: i32,
}

impl Grid {
    /// Builds a grid, rejecting a board edge that is not a positive multiple
    /// of the cell size.
    pub fn new(board_size: i32, cell_size: i32) -> Result<Self, ConfigError> {
        if board_size <= 0 || cell_size <= 0 {
            return Err(ConfigError::NonPositiveBoard {
                board_size,
                cell_size,
            });
        }
        if board_size % cell_size != 0 {
            return Err(ConfigError::MisalignedBoard {
                board_size,
                cell_size,
            });
        }
        Ok(Self {
            board_size,
            cell_size,
        })
    }

    #[must_use]
    pub fn board_size(self) -> i32 {
        self.board_size
    }

    #[must_use]
    pub fn cell_size(self) -> i32 {
        self.cell_size
    }

    /// Number of cells along one board edge.
    #[must_use]
    pub fn cells_per_axis(self) -> i32 {
        self.board_size / self.cell_size
    }

    /// Wraps a position that stepped one cell off the board back onto it.
    ///
    /// A negative coordinate becomes `board - cell`, a coordinate at or past
    /// the board edge becomes 0, anything in range passes through. Single-step
    /// clamp rather than modulo: the snake only ever moves one cell.
    #[must_use]
    pub fn wrap(self, position: Position) -> Position {
        Position {
            x: self.wrap_axis(position.x),
            y: self.wrap_axis(position.y),
        }
    }

    fn wrap_axis(self, value: i32) -> i32 {
        if value < 0 {
            self.board_size - self.cell_size
        } else if value >= self.board_size {
            0
        } else {
            value
        }
    }

    /// Returns true when `position` lies on the board.
    #[must_use]
    pub fn contains(self, position: Position) -> bool {
        (0..self.board_size).contains(&position.x) && (0..self.board_size).contains(&position.y)
    }

    /// Draws a uniformly random grid-aligned position.
    #[must_use]
    pub fn random_cell<R: Rng + ?Sized>(self, rng: &mut R) -> Position {
        let cells = self.cells_per_axis();
        Position {
            x: rng.gen_range(0..cells) * self.cell_size,
            y: rng.gen_range(0..cells) * self.cell_size,
        }
    }

    /// Converts a board position into cell coordinates for the renderer.
    #[must_use]
    pub fn cell_of(self, position: Position) -> Option<(u16, u16)> {
        if !self.contains(position) {
            return None;
        }
        let x = u16::try_from(position.x / self.cell_size).ok()?;
        let y = u16::try_from(position.y / self.cell_size).ok()?;
        Some((x, y))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{Grid, Position};
    use crate::config::ConfigError;

    fn grid() -> Grid {
        Grid::new(600, 20).expect("600 is a multiple of 20")
    }

    #[test]
    fn misaligned_board_is_a_configuration_error() {
        assert_eq!(
            Grid::new(610, 20),
            Err(ConfigError::MisalignedBoard {
                board_size: 610,
                cell_size: 20
            })
        );
        assert_eq!(
            Grid::new(0, 20),
            Err(ConfigError::NonPositiveBoard {
                board_size: 0,
                cell_size: 20
            })
        );
        assert_eq!(
            Grid::new(600, -20),
            Err(ConfigError::NonPositiveBoard {
                board_size: 600,
                cell_size: -20
            })
        );
    }

    #[test]
    fn wrap_leaves_in_range_coordinates_unchanged() {
        for x in (0..600).step_by(20) {
            let p = Position { x, y: 100 };
            assert_eq!(grid().wrap(p), p);
        }
    }

    #[test]
    fn wrap_maps_edges_to_opposite_sides() {
        assert_eq!(
            grid().wrap(Position { x: -20, y: 100 }),
            Position { x: 580, y: 100 }
        );
        assert_eq!(
            grid().wrap(Position { x: 600, y: 100 }),
            Position { x: 0, y: 100 }
        );
        assert_eq!(
            grid().wrap(Position { x: 100, y: -20 }),
            Position { x: 100, y: 580 }
        );
        assert_eq!(
            grid().wrap(Position { x: 100, y: 600 }),
            Position { x: 100, y: 0 }
        );
    }

    #[test]
    fn random_cells_are_grid_aligned_and_on_board() {
        let grid = grid();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let p = grid.random_cell(&mut rng);
            assert!(grid.contains(p));
            assert_eq!(p.x % grid.cell_size(), 0);
            assert_eq!(p.y % grid.cell_size(), 0);
        }
    }

    #[test]
    fn cell_of_scales_down_and_rejects_off_board() {
        assert_eq!(grid().cell_of(Position { x: 580, y: 0 }), Some((29, 0)));
        assert_eq!(grid().cell_of(Position { x: 600, y: 0 }), None);
        assert_eq!(grid().cell_of(Position { x: -20, y: 0 }), None);
    }
}
