//! Multi-source breadth-first distance fields over a [`Grid`].

use crate::grid::{Adjacency, Grid, Position};
use std::collections::VecDeque;

/// Shortest 4-connected, obstacle-avoiding step count from every cell to the
/// nearest source. Cells no source can reach hold [`DistanceField::unreachable`],
/// which is `height * width` and therefore larger than any real path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceField {
    height: usize,
    width: usize,
    distances: Vec<usize>,
}

impl DistanceField {
    /// Runs one BFS seeded from every in-bounds source at once.
    ///
    /// All sources are enqueued before the first dequeue, so the wavefront
    /// expands from every source simultaneously. The queue must stay FIFO:
    /// the first visit to a cell is only its shortest distance when cells are
    /// expanded in nondecreasing distance order.
    pub fn compute(grid: &Grid, sources: &[Position]) -> Self {
        let height = grid.height();
        let width = grid.width();
        let unreachable = grid.cell_count();
        let mut distances = vec![unreachable; unreachable];
        let mut visited = vec![false; unreachable];
        let mut queue = VecDeque::with_capacity(sources.len());

        for &source in sources {
            let Some(idx) = grid.index_of(source) else {
                continue;
            };
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            distances[idx] = 0;
            queue.push_back(source);
        }

        while let Some(cell) = queue.pop_front() {
            let next_distance = distances[cell.row * width + cell.col] + 1;
            for neighbor in grid.neighbors(cell, Adjacency::FourWay) {
                let idx = neighbor.row * width + neighbor.col;
                if visited[idx] || grid.blocked(neighbor) {
                    continue;
                }
                visited[idx] = true;
                distances[idx] = next_distance;
                queue.push_back(neighbor);
            }
        }

        tracing::trace!(
            height,
            width,
            sources = sources.len(),
            reached = visited.iter().filter(|v| **v).count(),
            "computed distance field"
        );

        Self {
            height,
            width,
            distances,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Sentinel stored in cells with no path to any source.
    pub fn unreachable(&self) -> usize {
        self.height * self.width
    }

    /// Distance at `pos`, or `None` when `pos` lies outside the field.
    pub fn get(&self, pos: Position) -> Option<usize> {
        (pos.row < self.height && pos.col < self.width)
            .then(|| self.distances[pos.row * self.width + pos.col])
    }

    /// Distance at a position already known to be in bounds.
    pub(crate) fn at(&self, pos: Position) -> usize {
        self.distances[pos.row * self.width + pos.col]
    }

    pub fn is_reachable(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(|d| d < self.unreachable())
    }

    /// Row-major distances.
    pub fn as_slice(&self) -> &[usize] {
        &self.distances
    }

    pub fn rows(&self) -> impl Iterator<Item = &[usize]> {
        self.distances.chunks(self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn open_grid_matches_manhattan_distance() {
        let grid = Grid::new(6, 9).unwrap();
        for target in [p(0, 0), p(3, 4), p(5, 8), p(2, 7)] {
            let field = DistanceField::compute(&grid, &[target]);
            for row in 0..6 {
                for col in 0..9 {
                    let cell = p(row, col);
                    assert_eq!(field.get(cell), Some(cell.manhattan(target)), "{cell:?}");
                }
            }
        }
    }

    #[test]
    fn enclosed_cells_are_unreachable() {
        let mut grid = Grid::new(5, 5).unwrap();
        for pos in [
            p(1, 1),
            p(1, 2),
            p(1, 3),
            p(2, 1),
            p(2, 3),
            p(3, 1),
            p(3, 2),
            p(3, 3),
        ] {
            grid.set_obstacle(pos).unwrap();
        }
        let field = DistanceField::compute(&grid, &[p(0, 0)]);
        assert_eq!(field.unreachable(), 25);
        assert_eq!(field.get(p(2, 2)), Some(25));
        assert!(!field.is_reachable(p(2, 2)));
        assert_eq!(field.get(p(4, 4)), Some(8));
    }

    #[test]
    fn no_sources_leaves_every_cell_unreachable() {
        let grid = Grid::new(3, 4).unwrap();
        let field = DistanceField::compute(&grid, &[]);
        assert_eq!(field.unreachable(), grid.cell_count());
        assert!(field.as_slice().iter().all(|&d| d == 12));
    }

    #[test]
    fn multiple_sources_take_the_nearest() {
        let grid = Grid::new(1, 7).unwrap();
        let field = DistanceField::compute(&grid, &[p(0, 0), p(0, 6), p(0, 6)]);
        assert_eq!(field.as_slice(), &[0, 1, 2, 3, 2, 1, 0]);
    }

    #[test]
    fn paths_route_around_obstacles() {
        // . # .
        // . # .
        // . . .
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set_obstacle(p(0, 1)).unwrap();
        grid.set_obstacle(p(1, 1)).unwrap();
        let field = DistanceField::compute(&grid, &[p(0, 0)]);
        assert_eq!(field.get(p(0, 2)), Some(6));
        assert_eq!(field.get(p(0, 1)), Some(9));
    }

    #[test]
    fn finite_distances_have_a_predecessor() {
        let mut grid = Grid::new(8, 8).unwrap();
        for pos in [p(1, 1), p(1, 2), p(2, 5), p(3, 5), p(4, 5), p(6, 0), p(6, 1)] {
            grid.set_obstacle(pos).unwrap();
        }
        let field = DistanceField::compute(&grid, &[p(0, 7), p(7, 3)]);
        for row in 0..8 {
            for col in 0..8 {
                let cell = p(row, col);
                let d = field.at(cell);
                if d == 0 || d == field.unreachable() {
                    continue;
                }
                assert!(
                    grid.neighbors(cell, Adjacency::FourWay)
                        .any(|n| field.at(n) == d - 1),
                    "cell {cell:?} at distance {d} has no predecessor"
                );
            }
        }
    }

    #[test]
    fn rows_follow_grid_shape() {
        let grid = Grid::new(2, 3).unwrap();
        let field = DistanceField::compute(&grid, &[p(1, 2)]);
        let rows: Vec<Vec<usize>> = field.rows().map(<[usize]>::to_vec).collect();
        assert_eq!(rows, vec![vec![3, 2, 1], vec![2, 1, 0]]);
    }
}
