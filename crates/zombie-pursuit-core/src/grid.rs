use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A cell coordinate. Rows grow downward, columns grow rightward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn manhattan(self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl From<Position> for (usize, usize) {
    fn from(pos: Position) -> Self {
        (pos.row, pos.col)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
enum Cell {
    #[default]
    Empty,
    Obstacle,
}

/// Neighborhood used when enumerating moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Adjacency {
    /// Up, down, left, right.
    FourWay,
    /// The four orthogonal neighbors followed by the four diagonals.
    EightWay,
}

impl Adjacency {
    const FOUR: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
    const EIGHT: [(isize, isize); 8] = [
        (-1, 0),
        (1, 0),
        (0, -1),
        (0, 1),
        (-1, -1),
        (-1, 1),
        (1, -1),
        (1, 1),
    ];

    pub fn offsets(self) -> &'static [(isize, isize)] {
        match self {
            Adjacency::FourWay => &Self::FOUR,
            Adjacency::EightWay => &Self::EIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("position ({row}, {col}) is outside the {height}x{width} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },
    #[error("invalid grid dimensions {height}x{width}: {reason}")]
    InvalidConfiguration {
        height: usize,
        width: usize,
        reason: &'static str,
    },
}

/// Fixed-size occupancy map stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Upper bound on `height * width`, keeping distance fields small enough to allocate.
    pub const MAX_CELLS: usize = 1 << 24;

    pub fn new(height: usize, width: usize) -> Result<Self, GridError> {
        Self::check_dimensions(height, width)?;
        Ok(Self {
            height,
            width,
            cells: vec![Cell::Empty; height * width],
        })
    }

    pub fn check_dimensions(height: usize, width: usize) -> Result<(), GridError> {
        if height == 0 || width == 0 {
            return Err(GridError::InvalidConfiguration {
                height,
                width,
                reason: "height and width must be positive",
            });
        }
        match height.checked_mul(width) {
            Some(cells) if cells <= Self::MAX_CELLS => Ok(()),
            _ => Err(GridError::InvalidConfiguration {
                height,
                width,
                reason: "cell count exceeds supported maximum",
            }),
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.height && pos.col < self.width
    }

    pub fn check(&self, pos: Position) -> Result<(), GridError> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                row: pos.row,
                col: pos.col,
                height: self.height,
                width: self.width,
            })
        }
    }

    /// Row-major index of an in-bounds position.
    pub fn index_of(&self, pos: Position) -> Option<usize> {
        self.contains(pos).then(|| pos.row * self.width + pos.col)
    }

    pub fn set_obstacle(&mut self, pos: Position) -> Result<(), GridError> {
        self.check(pos)?;
        let idx = pos.row * self.width + pos.col;
        self.cells[idx] = Cell::Obstacle;
        Ok(())
    }

    pub fn set_empty(&mut self, pos: Position) -> Result<(), GridError> {
        self.check(pos)?;
        let idx = pos.row * self.width + pos.col;
        self.cells[idx] = Cell::Empty;
        Ok(())
    }

    pub fn is_obstacle(&self, pos: Position) -> Result<bool, GridError> {
        self.check(pos)?;
        Ok(self.blocked(pos))
    }

    /// Obstacle test for positions already known to be in bounds.
    pub(crate) fn blocked(&self, pos: Position) -> bool {
        debug_assert!(self.contains(pos));
        self.cells[pos.row * self.width + pos.col] == Cell::Obstacle
    }

    /// Resets every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    pub fn obstacles(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cell::Obstacle)
            .map(|(idx, _)| Position::new(idx / self.width, idx % self.width))
    }

    /// In-bounds neighbors of `pos`. Obstacles are not filtered.
    pub(crate) fn neighbors(
        &self,
        pos: Position,
        adjacency: Adjacency,
    ) -> impl Iterator<Item = Position> + '_ {
        adjacency.offsets().iter().filter_map(move |&(dr, dc)| {
            let row = pos.row.checked_add_signed(dr)?;
            let col = pos.col.checked_add_signed(dc)?;
            let next = Position::new(row, col);
            self.contains(next).then_some(next)
        })
    }

    pub fn four_neighbors(&self, pos: Position) -> Result<Vec<Position>, GridError> {
        self.check(pos)?;
        Ok(self.neighbors(pos, Adjacency::FourWay).collect())
    }

    pub fn eight_neighbors(&self, pos: Position) -> Result<Vec<Position>, GridError> {
        self.check(pos)?;
        Ok(self.neighbors(pos, Adjacency::EightWay).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            Grid::new(0, 5),
            Err(GridError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            Grid::new(5, 0),
            Err(GridError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            Grid::new(usize::MAX, 2),
            Err(GridError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn four_neighbors_respect_boundaries() {
        let grid = Grid::new(3, 4).unwrap();
        assert_eq!(grid.cell_count(), 12);
        assert_eq!(grid.four_neighbors(p(0, 0)).unwrap(), vec![p(1, 0), p(0, 1)]);
        assert_eq!(
            grid.four_neighbors(p(1, 1)).unwrap(),
            vec![p(0, 1), p(2, 1), p(1, 0), p(1, 2)]
        );
        assert_eq!(grid.four_neighbors(p(2, 3)).unwrap(), vec![p(1, 3), p(2, 2)]);
    }

    #[test]
    fn eight_neighbors_include_diagonals() {
        let grid = Grid::new(3, 3).unwrap();
        assert_eq!(grid.eight_neighbors(p(1, 1)).unwrap().len(), 8);
        assert_eq!(
            grid.eight_neighbors(p(0, 2)).unwrap(),
            vec![p(1, 2), p(0, 1), p(1, 1)]
        );
    }

    #[test]
    fn neighbors_do_not_filter_obstacles() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set_obstacle(p(0, 1)).unwrap();
        assert!(grid.four_neighbors(p(0, 0)).unwrap().contains(&p(0, 1)));
    }

    #[test]
    fn out_of_bounds_fails_without_mutation() {
        let mut grid = Grid::new(2, 3).unwrap();
        let err = grid.set_obstacle(p(2, 0)).unwrap_err();
        assert_eq!(
            err,
            GridError::OutOfBounds {
                row: 2,
                col: 0,
                height: 2,
                width: 3
            }
        );
        assert_eq!(grid.obstacles().count(), 0);
        assert!(grid.is_obstacle(p(0, 3)).is_err());
        assert!(grid.four_neighbors(p(5, 5)).is_err());
    }

    #[test]
    fn clear_resets_every_cell() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set_obstacle(p(0, 0)).unwrap();
        grid.set_obstacle(p(2, 1)).unwrap();
        assert_eq!(grid.obstacles().collect::<Vec<_>>(), vec![p(0, 0), p(2, 1)]);
        grid.clear();
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.width(), 3);
        assert!(grid.obstacles().next().is_none());
    }

    #[test]
    fn set_empty_undoes_obstacle() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set_obstacle(p(1, 1)).unwrap();
        assert!(grid.is_obstacle(p(1, 1)).unwrap());
        grid.set_empty(p(1, 1)).unwrap();
        assert!(!grid.is_obstacle(p(1, 1)).unwrap());
    }

    #[test]
    fn position_serializes_as_pair() {
        let json = serde_json::to_string(&p(3, 7)).unwrap();
        assert_eq!(json, "[3,7]");
        let back: Position = serde_json::from_str("[4,1]").unwrap();
        assert_eq!(back, p(4, 1));
    }
}
